use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Generation backend is not configured: set OPENAI_API_KEY (or LITELLM_API_KEY)")]
    MissingCredentials,

    #[error("Generation request failed: {0}")]
    GenerationRequestFailed(String),

    #[error("{0}")]
    GenerationRefused(String),

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),

    #[error("Generation response did not include any valid questions")]
    EmptyResult,

    #[error("Question set {0} not found")]
    SetNotFound(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingCredentials => "MISSING_CREDENTIALS",
            AppError::GenerationRequestFailed(_) => "GENERATION_REQUEST_FAILED",
            AppError::GenerationRefused(_) => "GENERATION_REFUSED",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::EmptyResult => "EMPTY_RESULT",
            AppError::SetNotFound(_) => "SET_NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub kind: &'static str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingCredentials => StatusCode::SERVICE_UNAVAILABLE,
            AppError::GenerationRequestFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::GenerationRefused(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::EmptyResult => StatusCode::BAD_GATEWAY,
            AppError::SetNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
            kind: self.error_code(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::GenerationRequestFailed(err.to_string())
    }
}
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(format!("I/O error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::SetNotFound(7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingCredentials.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::GenerationRefused("no".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::SetNotFound(3);
        assert_eq!(err.to_string(), "Question set 3 not found");

        let refused = AppError::GenerationRefused("cannot do that".into());
        assert_eq!(refused.to_string(), "cannot do that");
    }

    #[test]
    fn test_refusal_and_malformed_are_distinct() {
        assert_ne!(
            AppError::GenerationRefused("x".into()).error_code(),
            AppError::MalformedResponse("x".into()).error_code()
        );
    }
}

use actix_web::{post, web, HttpResponse};
use futures::StreamExt;
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{GenerateQuestionsRequest, InsertionPreviewRequest},
};

#[post("/api/questions/generate")]
pub async fn generate_questions(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuestionsRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .generation_service
        .generate(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Newline-delimited JSON, one generation event per line. Invalid requests are
/// rejected before the stream opens.
#[post("/api/questions/generate/stream")]
pub async fn generate_questions_stream(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuestionsRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let lines = state
        .generation_service
        .stream_generate(request)
        .map(|event| {
            event
                .to_ndjson_line()
                .map(web::Bytes::from)
                .map_err(|e| AppError::InternalError(e.to_string()))
        });

    Ok(HttpResponse::Ok()
        .content_type("application/x-ndjson")
        .streaming(lines))
}

#[post("/api/question-sets/{id}/insert-preview")]
pub async fn preview_insertion(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    request: web::Json<InsertionPreviewRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .generation_service
        .preview_insertion(id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

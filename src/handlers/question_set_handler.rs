use actix_web::{delete, get, http::header, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{
        domain::question_set::export_file_name,
        dto::request::{CanvasExportParams, CreateQuestionSetRequest, UpdateQuestionSetRequest},
    },
};

#[get("/api/question-sets")]
pub async fn list_question_sets(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let response = state.question_set_service.list().await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/question-sets/{id}")]
pub async fn get_question_set(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let detail = state.question_set_service.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[post("/api/question-sets")]
pub async fn create_question_set(
    state: web::Data<AppState>,
    request: web::Json<CreateQuestionSetRequest>,
) -> Result<HttpResponse, AppError> {
    let detail = state
        .question_set_service
        .create(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(detail))
}

#[put("/api/question-sets/{id}")]
pub async fn update_question_set(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    request: web::Json<UpdateQuestionSetRequest>,
) -> Result<HttpResponse, AppError> {
    let detail = state
        .question_set_service
        .update(id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[delete("/api/question-sets/{id}")]
pub async fn delete_question_set(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    state.question_set_service.delete(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Canvas markdown as a file download.
#[get("/api/question-sets/{id}/canvas")]
pub async fn export_canvas_markdown(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    params: web::Query<CanvasExportParams>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let markdown = state
        .question_set_service
        .canvas_markdown(id, &params)
        .await?;

    Ok(HttpResponse::Ok()
        .content_type("text/markdown; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export_file_name(id)),
        ))
        .body(markdown))
}

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use std::sync::Arc;

use crate::{
    AppState,
    dto::{ErrorResponse, NoteRequest, NoteResponse, SearchParams},
    handlers::rest::{ApiJson, ApiPath},
    service::NoteService,
};

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Invalid note", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    ApiJson(payload): ApiJson<NoteRequest>,
) -> Response {
    match service.create_note(payload).await {
        Ok(note) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/api/notes/{}", note.id))],
            Json(note),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = NoteRequest,
    responses(
        (status = 204, description = "Note updated successfully"),
        (status = 400, description = "Id mismatch or invalid note", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NoteRequest>,
) -> Response {
    match service.update_note(id, payload).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 204, description = "Note deleted successfully"),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    ApiPath(id): ApiPath<i64>,
) -> Response {
    match service.delete_note(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    ApiPath(id): ApiPath<i64>,
) -> Response {
    match service.get_one_note(id).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "All notes, most recently updated first", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    match service.get_all_notes().await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Notes whose title, content or tags contain the query", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn search_notes(
    State(service): State<Arc<NoteService>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.query.unwrap_or_default();

    match service.search_notes(&query).await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes/category/{category}",
    params(
        ("category" = String, Path, description = "Exact category name")
    ),
    responses(
        (status = 200, description = "Notes in the category", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler(state = AppState)]
pub async fn get_notes_by_category(
    State(service): State<Arc<NoteService>>,
    ApiPath(category): ApiPath<String>,
) -> Response {
    match service.get_notes_by_category(&category).await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => e.into_response(),
    }
}

mod categories;
mod notes;

pub use categories::*;
pub use notes::*;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::{FromRequest, FromRequestParts};
use utoipa::OpenApi;

use crate::{
    dto::{
        CategoryResponse, CreateCategoryRequest, ErrorResponse, NoteRequest, NoteResponse,
        UpdateCategoryRequest,
    },
    service::ServiceError,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        notes::create_note,
        notes::update_note,
        notes::delete_note,
        notes::get_one_note,
        notes::get_all_notes,
        notes::search_notes,
        notes::get_notes_by_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        categories::get_one_category,
        categories::get_all_categories
    ),
    components(schemas(
        NoteResponse,
        NoteRequest,
        CategoryResponse,
        CreateCategoryRequest,
        UpdateCategoryRequest,
        ErrorResponse
    )),
    tags(
        (name = "notes", description = "Notes management API"),
        (name = "categories", description = "Note categories API")
    )
)]
pub struct ApiDoc;

/// JSON body extractor whose rejections are reported as 400 with an
/// `ErrorResponse` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServiceError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections are reported as 400 with an
/// `ErrorResponse` body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServiceError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Repository(e) => {
                tracing::error!("storage failure: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error".to_string(),
                    }),
                )
                    .into_response();
            }
        };

        tracing::debug!("request rejected with {}: {}", status, self);

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

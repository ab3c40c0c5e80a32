use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use std::sync::Arc;

use crate::{
    AppState,
    dto::{CategoryResponse, CreateCategoryRequest, ErrorResponse, UpdateCategoryRequest},
    handlers::rest::{ApiJson, ApiPath},
    service::CategoryService,
};

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created successfully", body = CategoryResponse),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 409, description = "Category already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "categories"
)]
#[debug_handler(state = AppState)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    ApiJson(payload): ApiJson<CreateCategoryRequest>,
) -> Response {
    match service.create_category(payload).await {
        Ok(category) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/api/categories/{}", category.id))],
            Json(category),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 204, description = "Category renamed"),
        (status = 400, description = "Default category or id mismatch", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "categories"
)]
#[debug_handler(state = AppState)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateCategoryRequest>,
) -> Response {
    match service.update_category(id, payload).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted, its notes moved to General"),
        (status = 400, description = "Default categories cannot be deleted", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "categories"
)]
#[debug_handler(state = AppState)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    ApiPath(id): ApiPath<i64>,
) -> Response {
    match service.delete_category(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "categories"
)]
#[debug_handler(state = AppState)]
pub async fn get_one_category(
    State(service): State<Arc<CategoryService>>,
    ApiPath(id): ApiPath<i64>,
) -> Response {
    match service.get_one_category(id).await {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories ordered by name", body = Vec<CategoryResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "categories"
)]
#[debug_handler(state = AppState)]
pub async fn get_all_categories(State(service): State<Arc<CategoryService>>) -> Response {
    match service.get_all_categories().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => e.into_response(),
    }
}

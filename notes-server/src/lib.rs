pub mod config;
pub mod dto;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use axum::{
    Router,
    extract::FromRef,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use handlers::rest;
use repository::SharedRepository;
use service::{CategoryService, NoteService};

#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<NoteService>,
    pub categories: Arc<CategoryService>,
}

impl AppState {
    pub fn new(repo: &SharedRepository) -> Self {
        Self {
            notes: Arc::new(NoteService::new(repo.clone())),
            categories: Arc::new(CategoryService::new(repo.clone())),
        }
    }
}

impl FromRef<AppState> for Arc<NoteService> {
    fn from_ref(state: &AppState) -> Self {
        state.notes.clone()
    }
}

impl FromRef<AppState> for Arc<CategoryService> {
    fn from_ref(state: &AppState) -> Self {
        state.categories.clone()
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Builds the full HTTP application: REST API under `/api` and Swagger UI.
pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    let api_router = Router::new()
        .route(
            "/notes",
            get(rest::get_all_notes).post(rest::create_note),
        )
        .route("/notes/search", get(rest::search_notes))
        .route(
            "/notes/category/{category}",
            get(rest::get_notes_by_category),
        )
        .route(
            "/notes/{id}",
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .route(
            "/categories",
            get(rest::get_all_categories).post(rest::create_category),
        )
        .route(
            "/categories/{id}",
            get(rest::get_one_category)
                .put(rest::update_category)
                .delete(rest::delete_category),
        );

    Router::new()
        .route("/", get(root))
        .nest("/api", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

async fn root() -> Response {
    (StatusCode::OK, "NoteNest server is up").into_response()
}

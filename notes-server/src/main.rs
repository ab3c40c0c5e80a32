use notes_server::{AppState, app, config, repository};

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });

    // Repository creation and migration
    let repo = repository::open(&cfg.database).await.unwrap_or_else(|e| {
        tracing::error!("Failed to open storage: {e}");
        panic!("failed to open storage: {e}");
    });

    let router = app(AppState::new(&repo), &cfg.cors_origins);

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {}: {e}", cfg.listen_addr));
    let addr = listener
        .local_addr()
        .expect("listener has a local address");

    tracing::info!("REST server starting, listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, router)
        .await
        .expect("failed to start server");
}

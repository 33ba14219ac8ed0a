use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;
use service::{file::service_store::ServiceStore, runtime};

// The front end runs on its own dev server and calls the API cross-origin.
pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the services store named by `cfg` and build the router around it.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let store = ServiceStore::new(&cfg.storage.services_file, cfg.storage.on_read_error).await?;
    let state = AppState::new(store);
    Ok(routes::build_router(state, build_cors(), &cfg.http))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.storage.services_file, cfg.http.static_dir.as_deref()).await?;

    let app = build_app(&cfg).await?;

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr()).await?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        services_file = %cfg.storage.services_file,
        on_read_error = ?cfg.storage.on_read_error,
        "starting server"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

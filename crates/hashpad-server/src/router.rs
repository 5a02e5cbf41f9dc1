use axum::handler::Handler;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler;
use crate::state::AppState;

/// Build the axum router.
///
/// Static assets from `public_dir` take precedence; whatever they do not
/// cover goes to the hash router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let hash_routes = handler::route_handler.with_state(state.clone());
    let assets = ServeDir::new(&config.public_dir).fallback(hash_routes);

    let router = Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/api/blobs", post(handler::put_blob_handler))
        .route("/api/render", post(handler::render_handler))
        .route("/api/serialize", post(handler::serialize_handler))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http());

    let router = if config.allow_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };
    router.with_state(state)
}

use axum::extract::DefaultBodyLimit;
use axum::routing::any;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::resource;
use crate::state::AppState;

/// Build the router serving every mounted collection.
///
/// Every path goes through [`resource::dispatch`]; the root has no resource
/// of its own and answers 404.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/*path", any(resource::dispatch))
        .fallback(resource::dispatch)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http());
    let router = if config.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };
    router.with_state(state)
}

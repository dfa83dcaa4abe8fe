//! HTTP adapters - REST API for the kiosk frontend.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod game;
pub mod health;
pub mod middleware;

// Re-export key types for convenience
pub use game::game_routes;
pub use game::GameHandlers;
pub use middleware::RatePolicy;

/// Assembles the full application router.
///
/// CORS is permissive: the kiosk frontend is served from a separate
/// origin on the show floor network.
pub fn app_router(handlers: GameHandlers, chat_policy: RatePolicy) -> Router {
    Router::new()
        .merge(game_routes(handlers, chat_policy))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

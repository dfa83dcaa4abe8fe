//! HTTP routes for the game endpoints.

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};

use crate::adapters::http::middleware::{rate_limit_middleware, RatePolicy};

use super::handlers::{chat, generate_report, get_report, start_session, GameHandlers};

/// Creates the game router with all endpoints.
///
/// The chat route carries its own rate limit; the rest of the API is
/// left open because each kiosk session issues at most a handful of
/// session and report calls.
pub fn game_routes(handlers: GameHandlers, chat_policy: RatePolicy) -> Router {
    let chat_route = Router::new()
        .route("/api/chat", post(chat))
        .route_layer(axum_middleware::from_fn_with_state(
            chat_policy,
            rate_limit_middleware,
        ))
        .with_state(handlers.clone());

    Router::new()
        .route("/api/game/session/start", post(start_session))
        .route("/api/game/generate-report", post(generate_report))
        .route("/api/report/:id", get(get_report))
        .with_state(handlers)
        .merge(chat_route)
}

//! HTTP handlers for the game endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::error::GameError;
use crate::application::handlers::{
    ChatTurnCommand, ChatTurnHandler, GenerateReportCommand, GenerateReportHandler,
    GetReportHandler, GetReportQuery, StartSessionCommand, StartSessionHandler,
};
use crate::domain::foundation::SessionId;
use crate::ports::ReportRenderer;

use super::dto::{
    history_to_domain, ChatRequest, ChatResponse, ErrorEnvelope, GenerateReportRequest,
    GenerateReportResponse, GetReportResponse, ReportFormatQuery, StartSessionRequest,
    StartSessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct GameHandlers {
    start_handler: Arc<StartSessionHandler>,
    chat_handler: Arc<ChatTurnHandler>,
    generate_handler: Arc<GenerateReportHandler>,
    report_handler: Arc<GetReportHandler>,
    renderer: Arc<dyn ReportRenderer>,
}

impl GameHandlers {
    pub fn new(
        start_handler: Arc<StartSessionHandler>,
        chat_handler: Arc<ChatTurnHandler>,
        generate_handler: Arc<GenerateReportHandler>,
        report_handler: Arc<GetReportHandler>,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Self {
        Self {
            start_handler,
            chat_handler,
            generate_handler,
            report_handler,
            renderer,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/game/session/start - Start a session with known company info
pub async fn start_session(
    State(handlers): State<GameHandlers>,
    Json(req): Json<StartSessionRequest>,
) -> Response {
    let cmd = StartSessionCommand {
        mode: req.mode,
        niche: req.niche,
        language: req.language,
        company_name: req.company_name,
        site_url: req.site_url,
    };

    match handlers.start_handler.handle(cmd).await {
        Ok(result) => {
            let response = StartSessionResponse {
                session_id: result.session.id().to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_game_error(e),
    }
}

/// POST /api/chat - One conversation turn
pub async fn chat(State(handlers): State<GameHandlers>, Json(req): Json<ChatRequest>) -> Response {
    let session_id = match parse_session_id(req.session_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let history = match history_to_domain(req.history) {
        Ok(history) => history,
        Err(e) => {
            return handle_game_error(GameError::validation(format!(
                "Invalid message in history: {e}"
            )))
        }
    };

    let cmd = ChatTurnCommand {
        session_id,
        message: req.message,
        history,
        mode: req.mode,
        niche: req.niche,
        language: req.language,
    };

    match handlers.chat_handler.handle(cmd).await {
        Ok(result) => {
            let response = ChatResponse {
                message: result.message,
                provider: result.provider,
                ready_for_report: result.ready_for_report,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_game_error(e),
    }
}

/// POST /api/game/generate-report - Synthesize the final report
pub async fn generate_report(
    State(handlers): State<GameHandlers>,
    Json(req): Json<GenerateReportRequest>,
) -> Response {
    let session_id = match parse_session_id(req.session_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let history = match history_to_domain(req.history) {
        Ok(history) => history,
        Err(e) => {
            return handle_game_error(GameError::validation(format!(
                "Invalid message in history: {e}"
            )))
        }
    };

    let cmd = GenerateReportCommand {
        session_id,
        mode: req.mode,
        niche: req.niche,
        language: req.language,
        history,
        audit_summary: req.audit_html_summary,
    };

    match handlers.generate_handler.handle(cmd).await {
        Ok(result) => {
            let response = GenerateReportResponse {
                report: result.report,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_game_error(e),
    }
}

/// GET /api/report/:id - Fetch a stored report
pub async fn get_report(
    State(handlers): State<GameHandlers>,
    Path(session_id): Path<String>,
    Query(query): Query<ReportFormatQuery>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => {
            return handle_game_error(GameError::validation("Invalid session ID"));
        }
    };

    match handlers
        .report_handler
        .handle(GetReportQuery { session_id })
        .await
    {
        Ok(result) => {
            if query.format.as_deref() == Some("markdown") {
                let body = handlers.renderer.render(&result.report);
                return (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, handlers.renderer.content_type())],
                    body,
                )
                    .into_response();
            }

            let response = GetReportResponse {
                report: result.report,
                mode: result.mode,
                niche: result.niche,
                language: result.language,
                completed_at: result.completed_at.as_datetime().to_rfc3339(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_game_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: Option<&str>) -> Result<Option<SessionId>, Response> {
    match raw {
        None => Ok(None),
        Some(raw) => raw
            .parse::<SessionId>()
            .map(Some)
            .map_err(|_| handle_game_error(GameError::validation("Invalid session ID"))),
    }
}

fn handle_game_error(error: GameError) -> Response {
    let (status, code, message, details) = match &error {
        GameError::Validation(message) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            message.clone(),
            None,
        ),
        GameError::NotFound(message) => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone(), None)
        }
        GameError::RateLimitExceeded { retry_after_secs } => (
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMIT_EXCEEDED",
            format!("Rate limit exceeded. Try again in {retry_after_secs} seconds."),
            Some(serde_json::json!({ "retryAfterSecs": retry_after_secs })),
        ),
        GameError::InvalidPhaseTransition { from, action } => (
            StatusCode::CONFLICT,
            "INVALID_PHASE_TRANSITION",
            error.to_string(),
            Some(serde_json::json!({ "phase": from, "action": action })),
        ),
        GameError::ProviderExhausted { attempts } => (
            StatusCode::BAD_GATEWAY,
            "PROVIDER_EXHAUSTED",
            error.to_string(),
            Some(serde_json::json!({ "attempts": attempts })),
        ),
        GameError::ReportSynthesisFailed { .. } => (
            StatusCode::BAD_GATEWAY,
            "REPORT_SYNTHESIS_FAILED",
            error.to_string(),
            None,
        ),
        GameError::Persistence(detail) => {
            tracing::error!(detail = %detail, "internal error serving game request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            )
        }
    };

    let mut envelope = ErrorEnvelope::new(code, message);
    if let Some(details) = details {
        envelope = envelope.with_details(details);
    }

    let mut response = (status, Json(envelope)).into_response();
    if let GameError::RateLimitExceeded { retry_after_secs } = error {
        response.headers_mut().insert(
            "Retry-After",
            HeaderValue::from_str(&retry_after_secs.to_string()).unwrap(),
        );
    }
    response
}

//! Integration tests for the game HTTP API.
//!
//! These tests exercise the full wiring end to end:
//! 1. Requests enter through the real router and middleware stack
//! 2. Handlers drive the session phase machine and the provider chain
//! 3. Responses carry the wire contract the kiosk frontend expects
//!
//! Uses the mock provider and the in-memory store, so no network access
//! is needed.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use audit_quest::adapters::http::{app_router, GameHandlers, RatePolicy};
use audit_quest::adapters::{
    InMemorySessionStore, MarkdownRenderer, MockAIProvider, MockError, NoopExtractor,
    SlidingWindowGovernor,
};
use audit_quest::application::handlers::{
    ChatTurnHandler, GenerateReportHandler, GetReportHandler, StartSessionHandler,
};
use audit_quest::domain::conversation::ConversationEngine;
use audit_quest::domain::report::ReportSynthesizer;
use audit_quest::ports::{AIProvider, SessionStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Builds the real application router over the mock provider.
fn test_app(mock: &MockAIProvider, chat_limit: u32) -> Router {
    let provider: Arc<dyn AIProvider> = Arc::new(mock.clone());
    let engine = Arc::new(ConversationEngine::new(
        vec![provider],
        Duration::from_secs(5),
    ));
    let synthesizer = Arc::new(ReportSynthesizer::new(Arc::clone(&engine)));

    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    let handlers = GameHandlers::new(
        Arc::new(StartSessionHandler::new(Arc::clone(&store))),
        Arc::new(ChatTurnHandler::new(engine, Arc::clone(&store))),
        Arc::new(GenerateReportHandler::new(
            synthesizer,
            Arc::clone(&store),
            Arc::new(NoopExtractor),
        )),
        Arc::new(GetReportHandler::new(store)),
        Arc::new(MarkdownRenderer),
    );

    let chat_policy = RatePolicy::new(
        Arc::new(SlidingWindowGovernor::new()),
        "chat",
        chat_limit,
        Duration::from_secs(60),
    );

    app_router(handlers, chat_policy)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, read_json(response).await)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    (status, read_json(response).await)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

fn start_body() -> Value {
    json!({
        "mode": "audit",
        "niche": "restauration",
        "language": "fr",
        "companyName": "Chez Luc",
        "siteUrl": "https://chez-luc.fr"
    })
}

fn chat_body(session_id: &str, message: &str) -> Value {
    json!({
        "sessionId": session_id,
        "message": message,
        "history": [],
        "mode": "audit",
        "niche": "restauration",
        "language": "fr"
    })
}

fn valid_report_json() -> String {
    r#"{
        "mode": "audit",
        "language": "fr",
        "sector": "restauration",
        "summary": "Présence en ligne à renforcer.",
        "sections": [
            {"title": "Visibilité", "bullets": ["Créer une fiche Google Business Profile"]}
        ],
        "cta": "Lancez votre transformation digitale dès aujourd'hui."
    }"#
    .to_string()
}

/// Lets detached persistence tasks land before reading the store back.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

// =============================================================================
// Full Flow
// =============================================================================

#[tokio::test]
async fn full_game_flow_reaches_a_stored_report() {
    let mock = MockAIProvider::new()
        .with_response("Bienvenue ! Parlez-moi de votre établissement.")
        .with_response("Merci, j'ai tout ce qu'il me faut. [READY_FOR_REPORT]")
        .with_response(valid_report_json());
    let app = test_app(&mock, 20);

    // 1. Start the session.
    let (status, body) = post_json(&app, "/api/game/session/start", start_body()).await;
    assert_eq!(status, StatusCode::OK);
    let session_id = body["sessionId"].as_str().unwrap().to_string();

    // 2. First turn.
    let (status, body) = post_json(&app, "/api/chat", chat_body(&session_id, "Bonjour")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "mock");
    assert_eq!(body["readyForReport"], false);
    assert_eq!(
        body["message"],
        "Bienvenue ! Parlez-moi de votre établissement."
    );

    // 3. Second turn flips readiness and strips the marker.
    let (status, body) = post_json(
        &app,
        "/api/chat",
        chat_body(&session_id, "Je tiens un restaurant lyonnais."),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["readyForReport"], true);
    assert!(!body["message"].as_str().unwrap().contains("[READY_FOR_REPORT]"));
    settle().await;

    // 4. Synthesize the report.
    let (status, body) = post_json(
        &app,
        "/api/game/generate-report",
        json!({
            "sessionId": session_id,
            "mode": "audit",
            "niche": "restauration",
            "language": "fr",
            "history": []
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["sector"], "restauration");
    settle().await;

    // 5. The stored report is readable, with session metadata.
    let (status, body) = get(&app, &format!("/api/report/{session_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "audit");
    assert_eq!(body["niche"], "restauration");
    assert_eq!(body["language"], "fr");
    assert_eq!(body["report"]["sector"], "restauration");
    assert!(body["completedAt"].as_str().is_some());

    // 6. Reads are idempotent.
    let (_, again) = get(&app, &format!("/api/report/{session_id}")).await;
    assert_eq!(body, again);
}

#[tokio::test]
async fn markdown_variant_renders_the_stored_report() {
    let mock = MockAIProvider::new()
        .with_response("Bienvenue !")
        .with_response(valid_report_json());
    let app = test_app(&mock, 20);

    let (_, body) = post_json(&app, "/api/game/session/start", start_body()).await;
    let session_id = body["sessionId"].as_str().unwrap().to_string();
    post_json(&app, "/api/chat", chat_body(&session_id, "Bonjour")).await;
    settle().await;
    post_json(
        &app,
        "/api/game/generate-report",
        json!({
            "sessionId": session_id,
            "mode": "audit",
            "niche": "restauration",
            "language": "fr",
            "history": []
        }),
    )
    .await;
    settle().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/report/{session_id}?format=markdown"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/markdown"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let markdown = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(markdown.starts_with("# Rapport"));
    assert!(markdown.contains("## Visibilité"));
}

// =============================================================================
// Stateless Mode
// =============================================================================

#[tokio::test]
async fn chat_works_without_a_session() {
    let mock = MockAIProvider::new().with_response("Bienvenue !");
    let app = test_app(&mock, 20);

    let (status, body) = post_json(
        &app,
        "/api/chat",
        json!({
            "message": "Bonjour",
            "history": [
                {"role": "user", "content": "Salut"},
                {"role": "assistant", "content": "Bonjour, on commence ?"}
            ],
            "mode": "startup",
            "niche": "ecommerce",
            "language": "fr"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Bienvenue !");
}

#[tokio::test]
async fn report_generation_works_without_a_session() {
    let mock = MockAIProvider::new().with_response(valid_report_json());
    let app = test_app(&mock, 20);

    let (status, body) = post_json(
        &app,
        "/api/game/generate-report",
        json!({
            "mode": "audit",
            "niche": "restauration",
            "language": "fr",
            "history": [
                {"role": "user", "content": "Bonjour"},
                {"role": "assistant", "content": "Bienvenue !"}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["sector"], "restauration");
}

// =============================================================================
// Error Contract
// =============================================================================

#[tokio::test]
async fn unknown_session_chat_is_not_found() {
    let mock = MockAIProvider::new();
    let app = test_app(&mock, 20);

    let (status, body) = post_json(
        &app,
        "/api/chat",
        chat_body("00000000-0000-4000-8000-000000000000", "Bonjour"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Session not found");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn report_before_generation_is_not_found() {
    let mock = MockAIProvider::new();
    let app = test_app(&mock, 20);

    let (_, body) = post_json(&app, "/api/game/session/start", start_body()).await;
    let session_id = body["sessionId"].as_str().unwrap().to_string();

    let (status, body) = get(&app, &format!("/api/report/{session_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Report not yet generated");
}

#[tokio::test]
async fn malformed_session_id_is_a_validation_error() {
    let mock = MockAIProvider::new();
    let app = test_app(&mock, 20);

    let (status, body) = get(&app, "/api/report/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn oversized_message_is_rejected() {
    let mock = MockAIProvider::new();
    let app = test_app(&mock, 20);

    let (status, body) = post_json(
        &app,
        "/api/chat",
        json!({
            "message": "x".repeat(5001),
            "history": [],
            "mode": "audit",
            "niche": "restauration",
            "language": "fr"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn provider_exhaustion_maps_to_bad_gateway() {
    let mock = MockAIProvider::new().with_error(MockError::Unavailable {
        message: "down for maintenance".to_string(),
    });
    let app = test_app(&mock, 20);

    let (status, body) = post_json(
        &app,
        "/api/chat",
        json!({
            "message": "Bonjour",
            "history": [],
            "mode": "audit",
            "niche": "restauration",
            "language": "fr"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "PROVIDER_EXHAUSTED");
    assert!(body["error"]["details"]["attempts"].is_array());
}

// =============================================================================
// Rate Limiting
// =============================================================================

#[tokio::test]
async fn chat_is_rate_limited_per_client() {
    let mock = MockAIProvider::new()
        .with_response("Un")
        .with_response("Deux");
    let app = test_app(&mock, 2);

    for remaining in ["1", "0"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("X-Forwarded-For", "203.0.113.7")
                    .body(Body::from(
                        json!({
                            "message": "Bonjour",
                            "history": [],
                            "mode": "audit",
                            "niche": "restauration",
                            "language": "fr"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "2");
        assert_eq!(response.headers()["x-ratelimit-remaining"], remaining);
    }

    // Third request from the same client is rejected without a provider call.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .header("X-Forwarded-For", "203.0.113.7")
                .body(Body::from(
                    json!({
                        "message": "Trois",
                        "history": [],
                        "mode": "audit",
                        "niche": "restauration",
                        "language": "fr"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("Retry-After"));
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
    assert_eq!(mock.call_count(), 2);

    // A different client still has budget.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .header("X-Forwarded-For", "203.0.113.8")
                .body(Body::from(
                    json!({
                        "message": "Bonjour",
                        "history": [],
                        "mode": "audit",
                        "niche": "restauration",
                        "language": "fr"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn session_and_report_routes_are_not_rate_limited() {
    let mock = MockAIProvider::new();
    let app = test_app(&mock, 1);

    for _ in 0..3 {
        let (status, _) = post_json(&app, "/api/game/session/start", start_body()).await;
        assert_eq!(status, StatusCode::OK);
    }
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_status_and_version() {
    let mock = MockAIProvider::new();
    let app = test_app(&mock, 20);

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

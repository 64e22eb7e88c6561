// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /  and GET /health
// - POST /honeypot (auth, validation, reply contract)
// - POST /final-output (404 vs report shape)
// - GET /session/{id} (debug projection)

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use honeypot_intel::api::{router, AppState};
use honeypot_intel::config::AppConfig;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests
const API_KEY: &str = "test123";

/// Router with a config that cannot reach out to the network: the callback
/// threshold is far above the turns exercised here, and no LLM token is set.
fn test_router() -> Router {
    let config = AppConfig {
        api_key: Some(API_KEY.to_string()),
        final_output_min_turn: 1_000,
        hf_api_token: None,
        ..AppConfig::default()
    };
    router(AppState::from_config(config))
}

async fn json_body(resp: axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json body")
}

fn post(uri: &str, payload: &Json, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(k) = key {
        builder = builder.header("x-api-key", k);
    }
    builder
        .body(Body::from(payload.to_string()))
        .expect("build request")
}

fn turn_payload(session: &str, text: &str, history: Json) -> Json {
    json!({
        "sessionId": session,
        "message": { "text": text },
        "conversationHistory": history,
        "metadata": {},
    })
}

#[tokio::test]
async fn root_and_health_answer() {
    let app = test_router();

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;
    assert_eq!(v["status"], json!("active"));

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;
    assert_eq!(v["status"], json!("healthy"));
    assert!(v["timestamp"].is_number());
}

#[tokio::test]
async fn honeypot_rejects_bad_or_missing_api_key() {
    let app = test_router();
    let payload = turn_payload("s1", "urgent otp", json!([]));

    let resp = app
        .clone()
        .oneshot(post("/honeypot", &payload, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .oneshot(post("/honeypot", &payload, Some("wrong")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let v = json_body(resp).await;
    assert_eq!(v["detail"], json!("Invalid API Key"));
}

#[tokio::test]
async fn honeypot_requires_session_and_text() {
    let app = test_router();

    let resp = app
        .clone()
        .oneshot(post(
            "/honeypot",
            &turn_payload("", "hello", json!([])),
            Some(API_KEY),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .oneshot(post(
            "/honeypot",
            &turn_payload("s1", "   ", json!([])),
            Some(API_KEY),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn honeypot_turn_returns_a_usable_reply() {
    let app = test_router();
    let payload = turn_payload(
        "s1",
        "Your SBI account is blocked, share the OTP immediately",
        json!([]),
    );

    let resp = app
        .oneshot(post("/honeypot", &payload, Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = json_body(resp).await;
    assert_eq!(v["status"], json!("success"));
    let reply = v["reply"].as_str().expect("reply string");
    assert!(reply.len() >= 5, "reply too short: {reply}");
}

#[tokio::test]
async fn final_output_unknown_session_is_404() {
    let app = test_router();
    let resp = app
        .oneshot(post(
            "/final-output",
            &json!({ "sessionId": "never-seen" }),
            Some(API_KEY),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn final_output_carries_the_report_contract() {
    let app = test_router();

    let history = json!([
        { "sender": "scammer", "text": "This is the bank fraud department", "timestamp": 1 },
        { "sender": "user", "text": "who is this?", "timestamp": 2 },
    ]);
    let payload = turn_payload(
        "s-report",
        "Account blocked! Verify at http://sbi-verify.xyz or call 9876543210, ref SBI-12345",
        history,
    );
    let resp = app
        .clone()
        .oneshot(post("/honeypot", &payload, Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(post(
            "/final-output",
            &json!({ "sessionId": "s-report" }),
            Some(API_KEY),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;

    assert_eq!(v["sessionId"], json!("s-report"));
    assert_eq!(v["scamDetected"], json!(true));
    assert_ne!(v["scamType"], json!("none"));
    assert!(v["confidenceLevel"].as_f64().unwrap() >= 0.75);
    assert_eq!(v["totalMessagesExchanged"], json!(4));
    assert!(v["engagementDurationSeconds"].as_u64().unwrap() >= 1);
    assert!(v["agentNotes"].is_string());

    let intel = &v["extractedIntelligence"];
    assert_eq!(intel["phoneNumbers"], json!(["9876543210"]));
    assert_eq!(intel["phishingLinks"], json!(["http://sbi-verify.xyz"]));
    assert_eq!(intel["caseIds"], json!(["SBI-12345"]));
}

#[tokio::test]
async fn session_debug_projects_state_without_raw_replies() {
    let app = test_router();

    let payload = turn_payload("s-debug", "share your otp urgently", json!([]));
    app.clone()
        .oneshot(post("/honeypot", &payload, Some(API_KEY)))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session/s-debug")
                .header("x-api-key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;

    assert_eq!(v["scamDetected"], json!(true));
    assert_eq!(v["messagesSeen"], json!(1));
    assert_eq!(v["usedResponsesCount"], json!(1));
    assert!(v.get("usedResponses").is_none(), "raw dedup set must not leak");

    // Unknown ids are a clean 404.
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/session/who-dis")
                .header("x-api-key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

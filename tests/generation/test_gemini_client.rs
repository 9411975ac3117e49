// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GeminiClient tests against a local stand-in for the generative API
//!
//! These tests verify that:
//! - The prompt, temperature and API key reach the endpoint
//! - Non-success statuses surface as Status errors
//! - Safety blocks surface as Blocked errors
//! - A slow upstream hits the configured timeout

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use symptom_triage::{
    config::GenerationConfig,
    generation::{GeminiClient, GenerationClient, GenerationError},
};

#[derive(Clone, Copy)]
enum Behaviour {
    Complete,
    Fail,
    Block,
    Stall,
}

#[derive(Clone)]
struct FakeApi {
    behaviour: Behaviour,
    requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn generate_content(
    State(api): State<FakeApi>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    api.requests
        .lock()
        .unwrap()
        .push((model_action, key, body));

    match api.behaviour {
        Behaviour::Complete => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [
                            {"text": "---\nDepartment: ENT\n"},
                            {"text": "Explanation: Ear pain.\nTreatment:\n- Rest\n---"}
                        ]
                    },
                    "finishReason": "STOP"
                }]
            })),
        ),
        Behaviour::Fail => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": {"code": 503, "message": "The model is overloaded."}})),
        ),
        Behaviour::Block => (
            StatusCode::OK,
            Json(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
        ),
        Behaviour::Stall => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, Json(json!({})))
        }
    }
}

/// Helper: start the fake API and a client pointed at it
async fn setup(behaviour: Behaviour) -> (GeminiClient, FakeApi) {
    let api = FakeApi {
        behaviour,
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1beta/models/:model_action", post(generate_content))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = GenerationConfig {
        api_key: Some("test-key".to_string()),
        api_base: format!("http://{}/v1beta", addr),
        model: "gemini-1.5-flash-latest".to_string(),
        temperature: 0.3,
        timeout_secs: 1,
    };
    (GeminiClient::new(&config).unwrap(), api)
}

#[tokio::test]
async fn test_completion_round_trip() {
    let (client, api) = setup(Behaviour::Complete).await;

    let completion = client.generate("Patient's Symptoms: \"ear pain\"").await.unwrap();

    assert_eq!(
        completion,
        "---\nDepartment: ENT\nExplanation: Ear pain.\nTreatment:\n- Rest\n---"
    );

    let requests = api.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (model_action, key, body) = &requests[0];
    assert_eq!(model_action, "gemini-1.5-flash-latest:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(
        body["contents"][0]["parts"][0]["text"],
        "Patient's Symptoms: \"ear pain\""
    );
    let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
    assert!((temperature - 0.3).abs() < 1e-6);
}

#[tokio::test]
async fn test_error_status_surfaces_body() {
    let (client, _api) = setup(Behaviour::Fail).await;

    let err = client.generate("prompt").await.unwrap_err();

    match err {
        GenerationError::Status { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("overloaded"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_blocked_prompt() {
    let (client, _api) = setup(Behaviour::Block).await;

    let err = client.generate("prompt").await.unwrap_err();

    assert!(matches!(err, GenerationError::Blocked(reason) if reason == "SAFETY"));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let (client, _api) = setup(Behaviour::Stall).await;

    let err = client.generate("prompt").await.unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
}

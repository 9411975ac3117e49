// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /analyze endpoint tests
//!
//! These tests verify that:
//! - Missing, empty or whitespace-only symptoms yield 400
//! - Malformed JSON yields 400
//! - Parsed, unparsed and failed completions are shaped correctly
//! - Identical requests give identical responses
//! - An empty knowledge base never reaches the generation client

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use mockall::mock;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use symptom_triage::{
    api::{create_app, AppState},
    embeddings::{Embedder, HashingEmbedder},
    generation::{GenerationClient, GenerationError},
    knowledge::KnowledgeEntry,
    rag::{KnowledgeIndex, Retriever},
    triage::TriageService,
    vector::IndexKind,
};
use tower::util::ServiceExt; // for `oneshot`

const TWO_SECTIONS: &str = "---\nDepartment: ENT\nExplanation: Ear pain suggests an ear problem.\nTreatment:\n- Keep the ear dry\n- See an ENT specialist\n---\n\n---\nDepartment: Dermatology\nExplanation: The itchy rash is a skin condition.\nTreatment:\n- Avoid scratching\n---";

mock! {
    pub Generator {}

    #[async_trait]
    impl GenerationClient for Generator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
        fn model_name(&self) -> String;
    }
}

/// Returns one fixed completion and records every prompt it receives
struct ScriptedGenerator {
    completion: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(completion: &str) -> Self {
        Self {
            completion: completion.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.completion.clone())
    }

    fn model_name(&self) -> String {
        "scripted".to_string()
    }
}

fn knowledge_base() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new("ENT", "Ear pain, hearing loss, ringing in the ears and sore throat."),
        KnowledgeEntry::new("Dermatology", "Skin rash, itching, acne and eczema."),
        KnowledgeEntry::new("Cardiology", "Chest pain, palpitations and shortness of breath."),
    ]
}

/// Helper: Router over the given knowledge base and generation client
async fn setup_app(
    entries: Vec<KnowledgeEntry>,
    generator: Arc<dyn GenerationClient>,
) -> Router {
    let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::new(256).unwrap());
    let index = KnowledgeIndex::build(entries, embedder, IndexKind::Flat)
        .await
        .unwrap();
    let triage = TriageService::new(Retriever::new(Arc::new(index)), generator, 6);
    create_app(Arc::new(AppState::new(Arc::new(triage))))
}

fn analyze_request(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_blank_symptoms_return_400() {
    for body in [
        json!({"symptoms": ""}),
        json!({"symptoms": "   \t\n  "}),
        json!({"age": 40, "gender": "female"}),
        json!({"symptoms": null}),
    ] {
        let mut generator = MockGenerator::new();
        generator.expect_generate().never();
        let app = setup_app(knowledge_base(), Arc::new(generator)).await;

        let (status, value) = send(app, analyze_request(body.to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(value, json!({"error": "No symptoms provided"}));
    }
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let app = setup_app(knowledge_base(), Arc::new(ScriptedGenerator::new(""))).await;

    let (status, value) = send(app, analyze_request("{\"symptoms\": ")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_two_sections_join_in_order() {
    let app = setup_app(knowledge_base(), Arc::new(ScriptedGenerator::new(TWO_SECTIONS))).await;

    let (status, value) = send(
        app,
        analyze_request(json!({"symptoms": "ear pain and itchy rash", "age": 25}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["department"], "ENT, Dermatology");
    assert_eq!(
        value["answer"],
        "Ear pain suggests an ear problem., The itchy rash is a skin condition."
    );
    assert_eq!(
        value["treatment"],
        "\nDepartment: ENT\n- Keep the ear dry\n- See an ENT specialist\n\nDepartment: Dermatology\n- Avoid scratching"
    );
    assert_eq!(value.as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unmarked_completion_is_not_identified() {
    let completion = "You should rest and drink fluids.";
    let app = setup_app(knowledge_base(), Arc::new(ScriptedGenerator::new(completion))).await;

    let (status, value) =
        send(app, analyze_request(json!({"symptoms": "tired"}).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["department"], "Not Identified");
    assert_eq!(value["answer"], completion);
    assert_eq!(value["treatment"], "No specific treatment found.");
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let generator = Arc::new(ScriptedGenerator::new(TWO_SECTIONS));
    let app = setup_app(knowledge_base(), generator.clone()).await;
    let body = json!({"symptoms": "ringing in my ears", "age": "67", "gender": "FEMALE"}).to_string();

    let (first_status, first) = send(app.clone(), analyze_request(body.clone())).await;
    let (second_status, second) = send(app, analyze_request(body)).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);
    assert!(prompts[0].contains("Age and Gender: Elderly Female"));
}

#[tokio::test]
async fn test_upstream_failure_returns_500() {
    let mut generator = MockGenerator::new();
    generator.expect_generate().times(1).returning(|_| {
        Err(GenerationError::Status {
            status: 429,
            body: "quota exceeded".to_string(),
        })
    });
    let app = setup_app(knowledge_base(), Arc::new(generator)).await;

    let (status, value) =
        send(app, analyze_request(json!({"symptoms": "chest pain"}).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(value["error"].as_str().unwrap().contains("quota exceeded"));
}

#[tokio::test]
async fn test_empty_knowledge_base_skips_generation() {
    let mut generator = MockGenerator::new();
    generator.expect_generate().never();
    let app = setup_app(Vec::new(), Arc::new(generator)).await;

    let (status, value) =
        send(app, analyze_request(json!({"symptoms": "headache"}).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["department"], "Not Identified");
    assert!(value["answer"]
        .as_str()
        .unwrap()
        .starts_with("I'm sorry, I couldn't find any relevant information"));
    assert_eq!(
        value["treatment"],
        "- Seek medical attention\n- Avoid self-diagnosis\n- Maintain symptom log\n- Visit nearest hospital if symptoms worsen"
    );
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let app = setup_app(knowledge_base(), Arc::new(ScriptedGenerator::new(""))).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/analyze")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = setup_app(knowledge_base(), Arc::new(ScriptedGenerator::new(TWO_SECTIONS))).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::from(json!({"symptoms": "rash"}).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /health endpoint tests

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use std::sync::Arc;
use symptom_triage::{
    api::{create_app, AppState, HealthResponse},
    embeddings::{hashing::HASHING_MODEL_NAME, Embedder, HashingEmbedder},
    generation::{GenerationClient, GenerationError},
    knowledge::bundled_entries,
    rag::{KnowledgeIndex, Retriever},
    triage::TriageService,
    vector::IndexKind,
};
use tower::util::ServiceExt;

struct UnusedGenerator;

#[async_trait]
impl GenerationClient for UnusedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::EmptyCompletion)
    }

    fn model_name(&self) -> String {
        "gemini-1.5-flash-latest".to_string()
    }
}

#[tokio::test]
async fn test_health_reports_loaded_services() {
    let entries = bundled_entries().unwrap();
    let expected_entries = entries.len();

    let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::new(128).unwrap());
    let index = KnowledgeIndex::build(entries, embedder, IndexKind::Flat)
        .await
        .unwrap();
    let triage = TriageService::new(Retriever::new(Arc::new(index)), Arc::new(UnusedGenerator), 6);
    let app = create_app(Arc::new(AppState::new(Arc::new(triage))));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.knowledge_entries, expected_entries);
    assert_eq!(health.embedding_model, HASHING_MODEL_NAME);
    assert_eq!(health.generation_model, "gemini-1.5-flash-latest");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::http_server::AppState;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub knowledge_entries: usize,
    pub embedding_model: String,
    pub generation_model: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let index = state.triage.retriever().index();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: version::VERSION_NUMBER.to_string(),
        knowledge_entries: index.len(),
        embedding_model: index.embedding_model().to_string(),
        generation_model: state.triage.generation_model(),
        timestamp: chrono::Utc::now(),
    })
}

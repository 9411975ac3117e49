// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /analyze HTTP handler

use crate::api::analyze::{AnalyzeRequest, AnalyzeResponse};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// POST /analyze handler
///
/// Runs the triage pipeline for one patient.
///
/// # Status codes
/// - 200: `{department, answer, treatment}`
/// - 400: body is not valid JSON for the request shape, or no symptoms
/// - 500: retrieval or upstream generation failed
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("analyze", %request_id);

    async move {
        let Json(request) = payload.map_err(|rejection| {
            warn!("Rejected request body: {}", rejection.body_text());
            ApiError::InvalidRequest(format!("Invalid request body: {}", rejection.body_text()))
        })?;

        let query = request.into_query().map_err(|e| {
            warn!("Invalid analyze request: {}", e);
            e
        })?;

        info!(
            "Analyze request: {} symptom chars, age={}, gender={}",
            query.symptoms.len(),
            query.age,
            query.gender
        );

        match state.triage.analyze(&query).await {
            Ok(result) => Ok(Json(AnalyzeResponse::from(result))),
            Err(e) => {
                error!("Analyze request failed: {}", e);
                Err(ApiError::from(e))
            }
        }
    }
    .instrument(span)
    .await
}

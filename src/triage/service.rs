// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Triage pipeline: retrieve, compose, generate, parse

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::parser::{CompletionParser, RegexCompletionParser};
use super::prompt::{PatientProfile, PromptComposer};
use super::result::TriageResult;
use crate::generation::{GenerationClient, GenerationError};
use crate::rag::{RagError, Retriever};

pub const DEFAULT_AGE: i64 = 30;
pub const DEFAULT_GENDER: &str = "Male";

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] RagError),

    #[error("{0}")]
    Generation(#[from] GenerationError),
}

impl TriageError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, TriageError::InvalidInput(_))
    }
}

/// One patient's request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientQuery {
    pub symptoms: String,
    pub age: i64,
    pub gender: String,
}

impl PatientQuery {
    /// Missing age and gender fall back to 30 and `Male`
    pub fn new(symptoms: impl Into<String>, age: Option<i64>, gender: Option<String>) -> Self {
        Self {
            symptoms: symptoms.into(),
            age: age.unwrap_or(DEFAULT_AGE),
            gender: gender.unwrap_or_else(|| DEFAULT_GENDER.to_string()),
        }
    }

    /// Trimmed symptoms, or an error when nothing is left
    pub fn validated_symptoms(&self) -> Result<&str, TriageError> {
        let symptoms = self.symptoms.trim();
        if symptoms.is_empty() {
            return Err(TriageError::InvalidInput("No symptoms provided".to_string()));
        }
        Ok(symptoms)
    }
}

/// Owns every stage of the pipeline; shared across requests behind an `Arc`
pub struct TriageService {
    retriever: Retriever,
    composer: PromptComposer,
    generator: Arc<dyn GenerationClient>,
    parser: Arc<dyn CompletionParser>,
    top_k: usize,
}

impl TriageService {
    pub fn new(retriever: Retriever, generator: Arc<dyn GenerationClient>, top_k: usize) -> Self {
        Self {
            retriever,
            composer: PromptComposer::new(),
            generator,
            parser: Arc::new(RegexCompletionParser::new()),
            top_k,
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn CompletionParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn generation_model(&self) -> String {
        self.generator.model_name()
    }

    pub async fn analyze(&self, query: &PatientQuery) -> Result<TriageResult, TriageError> {
        let start = Instant::now();
        let symptoms = query.validated_symptoms()?;
        let profile = PatientProfile::new(query.age, &query.gender);

        let passages = self.retriever.retrieve(symptoms, self.top_k).await?;
        if passages.is_empty() {
            warn!("No knowledge passages retrieved; returning generic guidance");
            return Ok(TriageResult::no_context());
        }

        let prompt = self.composer.compose(symptoms, &profile, &passages);
        debug!("Composed prompt ({} chars) for profile {}", prompt.len(), profile);

        let completion = self.generator.generate(&prompt).await?;
        let result = TriageResult::from_outcome(self.parser.parse(&completion));

        info!(
            "Triage complete: department={:?}, passages={}, {}ms",
            result.department,
            passages.len(),
            start.elapsed().as_millis()
        );
        Ok(result)
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Generative Language API client (`models/{model}:generateContent`)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::client::GenerationClient;
use super::errors::GenerationError;
use crate::config::GenerationConfig;

// --- Request types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationParameters,
}

#[derive(Debug, Serialize)]
pub struct GenerationParameters {
    pub temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

// --- Response types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentRequest {
    pub fn new(prompt: &str, temperature: f32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationParameters { temperature },
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    pub fn completion_text(self) -> Result<String, GenerationError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GenerationError::Blocked(reason));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyCompletion)?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return match candidate.finish_reason.as_deref() {
                Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") => Err(
                    GenerationError::Blocked(candidate.finish_reason.unwrap_or_default()),
                ),
                _ => Err(GenerationError::EmptyCompletion),
            };
        }

        Ok(text)
    }
}

/// Client for the hosted Gemini text-generation endpoint
pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    /// Create a new GeminiClient
    ///
    /// The request timeout bounds how long a slow upstream can hold a request.
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerationError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_base = config.api_base.trim_end_matches('/').to_string();
        let model = config
            .model
            .trim_start_matches("models/")
            .to_string();

        info!(
            "Generation client configured: endpoint={}, model={}, temperature={}, timeout={}s",
            api_base, model, config.temperature, config.timeout_secs
        );

        Ok(Self {
            client,
            api_base,
            api_key,
            model,
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let start = std::time::Instant::now();
        let url = self.endpoint();
        debug!("Generation POST {} ({} prompt chars)", url, prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::new(prompt, self.temperature))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let api_response: GenerateContentResponse = response.json().await?;
        let text = api_response.completion_text()?;

        debug!(
            "Generation complete: {} chars in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

/// Errors from the hosted text-generation API
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation API key is not configured")]
    MissingApiKey,

    /// Transport failure, including timeouts
    #[error("Generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The API refused the prompt (safety block or similar)
    #[error("Generation blocked: {0}")]
    Blocked(String),

    #[error("Generation API returned no completion text")]
    EmptyCompletion,
}

impl GenerationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GenerationError::Http(e) if e.is_timeout())
    }
}

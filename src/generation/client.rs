// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generation client trait definition

use async_trait::async_trait;

use super::errors::GenerationError;

/// Sends a prompt to a text-generation backend and returns the raw completion
///
/// The completion carries no structural guarantee; callers must parse it
/// defensively.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Model identifier for logging and health reporting
    fn model_name(&self) -> String;
}

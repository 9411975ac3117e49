// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text generation via a hosted generative-language API

pub mod client;
pub mod errors;
pub mod gemini;

pub use client::GenerationClient;
#[cfg(test)]
pub use client::MockGenerationClient;
pub use errors::GenerationError;
pub use gemini::{GeminiClient, GenerateContentRequest, GenerateContentResponse};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text embedding models
//!
//! `OnnxEmbeddingModel` runs a sentence transformer exported to ONNX.
//! `HashingEmbedder` is a dependency-free lexical fallback used when no model
//! files are configured.

pub mod hashing;
pub mod onnx_model;

pub use hashing::HashingEmbedder;
pub use onnx_model::OnnxEmbeddingModel;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::EmbeddingSettings;

/// Produces fixed-dimension vectors for text
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

#[async_trait]
impl Embedder for OnnxEmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        OnnxEmbeddingModel::embed(self, text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        OnnxEmbeddingModel::embed_batch(self, texts).await
    }

    fn dimension(&self) -> usize {
        OnnxEmbeddingModel::dimension(self)
    }

    fn model_name(&self) -> &str {
        OnnxEmbeddingModel::model_name(self)
    }
}

/// Build the configured embedder
///
/// Uses the ONNX model when both model and tokenizer paths are set, otherwise
/// falls back to the hashing embedder.
pub async fn build_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    match (&settings.model_path, &settings.tokenizer_path) {
        (Some(model_path), Some(tokenizer_path)) => {
            let model =
                OnnxEmbeddingModel::new(settings.model_name.clone(), model_path, tokenizer_path)
                    .await?;
            info!(
                "Embedding model ready: {} ({} dimensions)",
                model.model_name(),
                model.dimension()
            );
            Ok(Arc::new(model))
        }
        _ => {
            warn!(
                "No ONNX model configured for {}; using hashing embedder ({} dimensions)",
                settings.model_name, settings.hashing_dimension
            );
            Ok(Arc::new(HashingEmbedder::new(settings.hashing_dimension)?))
        }
    }
}

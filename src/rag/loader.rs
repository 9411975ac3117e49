// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Knowledge index loader
//!
//! Orchestrates the startup path shared by the server and the CLI:
//!
//! 1. Open the configured knowledge store (MongoDB, JSON file or bundled)
//! 2. Load entries, honouring the optional load limit
//! 3. Build the embedder (ONNX model or hashing fallback)
//! 4. Embed every entry and build the vector index

use anyhow::{Context, Result};
use tracing::info;

use super::index_builder::KnowledgeIndex;
use crate::config::TriageConfig;
use crate::embeddings::build_embedder;
use crate::knowledge::open_store;

pub async fn load_knowledge_index(config: &TriageConfig) -> Result<KnowledgeIndex> {
    let store = open_store(&config.knowledge)
        .await
        .context("Failed to open knowledge store")?;

    let entries = store
        .load_entries(config.knowledge.load_limit)
        .await
        .with_context(|| format!("Failed to load knowledge entries from {}", store.describe()))?;
    info!("Loaded {} knowledge entries from {}", entries.len(), store.describe());

    let embedder = build_embedder(&config.embedding)
        .await
        .context("Failed to initialise embedding model")?;

    let index = KnowledgeIndex::build(entries, embedder, config.embedding.index_kind)
        .await
        .context("Failed to build knowledge index")?;

    Ok(index)
}

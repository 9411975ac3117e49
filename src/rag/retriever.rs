// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Top-k passage retrieval over the knowledge index

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::errors::RagError;
use super::index_builder::KnowledgeIndex;

/// Retriever default for ad-hoc searches; the triage pipeline asks for more
pub const DEFAULT_K: usize = 3;

/// A knowledge entry surfaced for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Department title of the source entry
    pub title: String,
    pub content: String,
    /// Cosine similarity to the query (informational, never a cut-off)
    pub score: f32,
}

/// Cheap-to-clone handle over the shared, read-only index
#[derive(Debug, Clone)]
pub struct Retriever {
    index: Arc<KnowledgeIndex>,
}

impl Retriever {
    pub fn new(index: Arc<KnowledgeIndex>) -> Self {
        Self { index }
    }

    /// Up to `k` passages in decreasing similarity order
    ///
    /// Weak matches are still returned when fewer than `k` strong ones exist.
    /// An empty index yields an empty vector rather than an error.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>, RagError> {
        let hits = self.index.search(query, k).await?;

        let passages: Vec<RetrievedPassage> = hits
            .into_iter()
            .map(|(entry, score)| RetrievedPassage {
                title: entry.department.clone(),
                content: entry.content.clone(),
                score,
            })
            .collect();

        debug!(
            "Retrieved {} passages (k={}): {:?}",
            passages.len(),
            k,
            passages.iter().map(|p| p.title.as_str()).collect::<Vec<_>>()
        );

        Ok(passages)
    }

    pub fn index(&self) -> &KnowledgeIndex {
        &self.index
    }
}

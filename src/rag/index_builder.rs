// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Knowledge index construction
//!
//! Embeds every knowledge entry's content once and builds the configured
//! nearest-neighbor index. The result is immutable and shared by reference.

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::errors::RagError;
use crate::embeddings::Embedder;
use crate::knowledge::KnowledgeEntry;
use crate::vector::{build_index, IndexKind, Neighbor, VectorIndex};

/// Knowledge entries paired with an index over their content embeddings
pub struct KnowledgeIndex {
    entries: Vec<KnowledgeEntry>,
    index: Box<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
    kind: IndexKind,
}

impl std::fmt::Debug for KnowledgeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeIndex")
            .field("entries", &self.entries.len())
            .field("kind", &self.kind)
            .field("embedding_model", &self.embedder.model_name())
            .finish_non_exhaustive()
    }
}

impl KnowledgeIndex {
    /// Embed all entries and build the index
    ///
    /// An empty entry list builds an empty index; searches then return nothing.
    pub async fn build(
        entries: Vec<KnowledgeEntry>,
        embedder: Arc<dyn Embedder>,
        kind: IndexKind,
    ) -> Result<Self, RagError> {
        let start = Instant::now();
        let dimensions = embedder.dimension();

        if entries.is_empty() {
            warn!("Knowledge base is empty; every retrieval will return no passages");
        }

        let texts: Vec<String> = entries.iter().map(|e| e.content.clone()).collect();
        let vectors = embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        if vectors.len() != texts.len() {
            return Err(RagError::CountMismatch {
                texts: texts.len(),
                vectors: vectors.len(),
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
            return Err(RagError::DimensionMismatch {
                expected: dimensions,
                actual: bad.len(),
            });
        }

        let index = build_index(kind, vectors, dimensions)
            .map_err(|e| RagError::IndexBuild(e.to_string()))?;

        info!(
            "Built {} knowledge index: {} entries, {}D ({}) in {}ms",
            kind,
            entries.len(),
            dimensions,
            embedder.model_name(),
            start.elapsed().as_millis()
        );

        Ok(Self {
            entries,
            index,
            embedder,
            kind,
        })
    }

    /// Embed `query` and return the nearest entries with their scores
    pub async fn search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<(&KnowledgeEntry, f32)>, RagError> {
        if self.index.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        if query_vector.len() != self.index.dimensions() {
            return Err(RagError::DimensionMismatch {
                expected: self.index.dimensions(),
                actual: query_vector.len(),
            });
        }

        let neighbors: Vec<Neighbor> = self
            .index
            .search(&query_vector, k)
            .map_err(|e| RagError::Search(e.to_string()))?;

        Ok(neighbors
            .into_iter()
            .filter_map(|n| self.entries.get(n.position).map(|entry| (entry, n.score)))
            .collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn embedding_model(&self) -> &str {
        self.embedder.model_name()
    }
}

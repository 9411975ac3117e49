// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for knowledge index construction and retrieval

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    /// Embedding model failed on a query or entry
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Embedder produced vectors of a different size than the index
    #[error("Dimension mismatch: index expects {expected}D vectors, embedder produced {actual}D")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Embedder returned a different number of vectors than texts
    #[error("Embedding count mismatch: {texts} texts produced {vectors} vectors")]
    CountMismatch { texts: usize, vectors: usize },

    /// Failed to build the nearest-neighbor index
    #[error("Failed to build index: {0}")]
    IndexBuild(String),

    /// Search over the built index failed
    #[error("Search failed: {0}")]
    Search(String),
}

impl RagError {
    /// Get error code for logging
    pub fn error_code(&self) -> &'static str {
        match self {
            RagError::Embedding(_) => "EMBEDDING_FAILED",
            RagError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            RagError::CountMismatch { .. } => "COUNT_MISMATCH",
            RagError::IndexBuild(_) => "INDEX_BUILD_FAILED",
            RagError::Search(_) => "SEARCH_FAILED",
        }
    }
}

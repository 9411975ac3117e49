// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for knowledge base loading

use thiserror::Error;

/// Errors that can occur while loading or seeding the knowledge base
#[derive(Error, Debug)]
pub enum KnowledgeError {
    /// Knowledge base file could not be read
    #[error("Failed to read knowledge base at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Knowledge base JSON did not match the entry schema
    #[error("Failed to parse knowledge base: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document database operation failed
    #[error("Document store error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// A record is missing its department or content
    #[error("Invalid knowledge entry at index {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

impl KnowledgeError {
    /// Get error code for logging
    pub fn error_code(&self) -> &'static str {
        match self {
            KnowledgeError::Io { .. } => "KB_IO_ERROR",
            KnowledgeError::Parse(_) => "KB_PARSE_ERROR",
            KnowledgeError::Database(_) => "KB_DATABASE_ERROR",
            KnowledgeError::InvalidEntry { .. } => "KB_INVALID_ENTRY",
        }
    }
}

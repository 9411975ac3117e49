// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Knowledge store trait and the JSON file implementation

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::entry::{parse_entries, KnowledgeEntry, BUNDLED_KNOWLEDGE_BASE};
use super::errors::KnowledgeError;

/// Source of knowledge entries read once at startup
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Load entries in storage order
    ///
    /// # Arguments
    /// * `limit` - Load only the first `limit` records (`None` loads all)
    async fn load_entries(&self, limit: Option<usize>) -> Result<Vec<KnowledgeEntry>, KnowledgeError>;

    /// Human-readable description for startup logs
    fn describe(&self) -> String;
}

enum JsonSource {
    File(PathBuf),
    Bundled,
}

/// Knowledge store backed by a JSON array of `{department, content}` records
pub struct JsonFileStore {
    source: JsonSource,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            source: JsonSource::File(path.into()),
        }
    }

    /// Store over the seed data compiled into the binary
    pub fn bundled() -> Self {
        Self {
            source: JsonSource::Bundled,
        }
    }
}

#[async_trait]
impl KnowledgeStore for JsonFileStore {
    async fn load_entries(&self, limit: Option<usize>) -> Result<Vec<KnowledgeEntry>, KnowledgeError> {
        let mut entries = match &self.source {
            JsonSource::File(path) => {
                let json = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| KnowledgeError::Io {
                        path: path.display().to_string(),
                        source,
                    })?;
                parse_entries(&json)?
            }
            JsonSource::Bundled => parse_entries(BUNDLED_KNOWLEDGE_BASE)?,
        };

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        debug!("Loaded {} knowledge entries from {}", entries.len(), self.describe());
        Ok(entries)
    }

    fn describe(&self) -> String {
        match &self.source {
            JsonSource::File(path) => format!("file {}", path.display()),
            JsonSource::Bundled => "bundled knowledge base".to_string(),
        }
    }
}

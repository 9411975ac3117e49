// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

use super::errors::KnowledgeError;

/// Seed knowledge base shipped with the service (`data/knowledge_base.json`)
pub const BUNDLED_KNOWLEDGE_BASE: &str = include_str!("../../data/knowledge_base.json");

/// One curated reference record: a department title and its guidance text
///
/// Records are written once by the seed tooling and only read while serving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub department: String,
    pub content: String,
}

impl KnowledgeEntry {
    pub fn new(department: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            content: content.into(),
        }
    }
}

/// Parse a JSON array of knowledge entries and validate every record
pub fn parse_entries(json: &str) -> Result<Vec<KnowledgeEntry>, KnowledgeError> {
    let entries: Vec<KnowledgeEntry> = serde_json::from_str(json)?;
    validate_entries(&entries)?;
    Ok(entries)
}

/// Reject records with a blank department or content
pub fn validate_entries(entries: &[KnowledgeEntry]) -> Result<(), KnowledgeError> {
    for (index, entry) in entries.iter().enumerate() {
        if entry.department.trim().is_empty() {
            return Err(KnowledgeError::InvalidEntry {
                index,
                reason: "empty department".to_string(),
            });
        }
        if entry.content.trim().is_empty() {
            return Err(KnowledgeError::InvalidEntry {
                index,
                reason: "empty content".to_string(),
            });
        }
    }
    Ok(())
}

/// Entries from the bundled seed file
pub fn bundled_entries() -> Result<Vec<KnowledgeEntry>, KnowledgeError> {
    parse_entries(BUNDLED_KNOWLEDGE_BASE)
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Curated medical knowledge base: department/content records

pub mod entry;
pub mod errors;
pub mod mongo;
pub mod store;

pub use entry::{bundled_entries, parse_entries, KnowledgeEntry, BUNDLED_KNOWLEDGE_BASE};
pub use errors::KnowledgeError;
pub use mongo::MongoKnowledgeStore;
pub use store::{JsonFileStore, KnowledgeStore};

use crate::config::KnowledgeConfig;

/// Open the configured store: MongoDB, then a JSON file, then the bundled data
pub async fn open_store(config: &KnowledgeConfig) -> Result<Box<dyn KnowledgeStore>, KnowledgeError> {
    if let Some(uri) = &config.mongo_uri {
        let store = MongoKnowledgeStore::connect(uri, &config.database, &config.collection).await?;
        return Ok(Box::new(store));
    }

    match &config.file_path {
        Some(path) => Ok(Box::new(JsonFileStore::new(path.clone()))),
        None => Ok(Box::new(JsonFileStore::bundled())),
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! MongoDB-backed knowledge store
//!
//! Reads `{department, content}` documents from the configured collection.
//! Serving never writes; `insert_entries` exists for the seed command only.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{Client, Collection};
use tracing::{debug, info};

use super::entry::{validate_entries, KnowledgeEntry};
use super::errors::KnowledgeError;
use super::store::KnowledgeStore;

pub const DEFAULT_DATABASE: &str = "Healthcare";
pub const DEFAULT_COLLECTION: &str = "symptom";

pub struct MongoKnowledgeStore {
    collection: Collection<KnowledgeEntry>,
    database: String,
    collection_name: String,
}

impl MongoKnowledgeStore {
    /// Connect to the document store
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first load rather than here.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
    ) -> Result<Self, KnowledgeError> {
        let client = Client::with_uri_str(uri).await?;
        let collection = client
            .database(database)
            .collection::<KnowledgeEntry>(collection);

        info!(
            "Knowledge store configured: database={}, collection={}",
            database,
            collection.name()
        );

        Ok(Self {
            collection_name: collection.name().to_string(),
            collection,
            database: database.to_string(),
        })
    }

    /// Batch insert entries, returning the number of inserted documents
    pub async fn insert_entries(&self, entries: &[KnowledgeEntry]) -> Result<usize, KnowledgeError> {
        validate_entries(entries)?;
        if entries.is_empty() {
            return Ok(0);
        }

        let result = self.collection.insert_many(entries, None).await?;
        info!(
            "Inserted {} knowledge entries into {}.{}",
            result.inserted_ids.len(),
            self.database,
            self.collection_name
        );
        Ok(result.inserted_ids.len())
    }
}

#[async_trait]
impl KnowledgeStore for MongoKnowledgeStore {
    async fn load_entries(&self, limit: Option<usize>) -> Result<Vec<KnowledgeEntry>, KnowledgeError> {
        let options = FindOptions::builder()
            .limit(limit.map(|l| l as i64))
            .build();

        let cursor = self.collection.find(None, options).await?;
        let entries: Vec<KnowledgeEntry> = cursor.try_collect().await?;
        validate_entries(&entries)?;

        debug!(
            "Loaded {} knowledge entries from {}.{}",
            entries.len(),
            self.database,
            self.collection_name
        );
        Ok(entries)
    }

    fn describe(&self) -> String {
        format!("mongodb {}.{}", self.database, self.collection_name)
    }
}

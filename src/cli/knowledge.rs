// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::TriageConfig;
use crate::knowledge::mongo::{DEFAULT_COLLECTION, DEFAULT_DATABASE};
use crate::knowledge::{JsonFileStore, KnowledgeStore, MongoKnowledgeStore};
use crate::rag::{load_knowledge_index, Retriever, DEFAULT_K};

/// Arguments for seed command
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// JSON file of `{department, content}` records (defaults to the bundled data)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// MongoDB connection string (not needed with --dry-run)
    #[arg(long, env = "MONGO_URI")]
    pub mongo_uri: Option<String>,

    /// Database name
    #[arg(long, env = "MONGO_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Collection name
    #[arg(long, env = "MONGO_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Validate and print the entries without inserting
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Symptom text to search for
    pub query: String,

    /// Number of passages to return
    #[arg(long, default_value_t = DEFAULT_K)]
    pub k: usize,
}

pub async fn seed(args: SeedArgs) -> Result<()> {
    let source = match &args.file {
        Some(path) => JsonFileStore::new(path.clone()),
        None => JsonFileStore::bundled(),
    };

    let entries = source
        .load_entries(None)
        .await
        .with_context(|| format!("Failed to read entries from {}", source.describe()))?;
    info!("Read {} entries from {}", entries.len(), source.describe());

    if args.dry_run {
        for entry in &entries {
            println!("{}: {}", entry.department, entry.content);
        }
        warn!("Dry run: nothing inserted");
        return Ok(());
    }

    let mongo_uri = args
        .mongo_uri
        .as_deref()
        .ok_or_else(|| anyhow!("MONGO_URI or --mongo-uri is required unless --dry-run is set"))?;
    let store = MongoKnowledgeStore::connect(mongo_uri, &args.database, &args.collection)
        .await
        .context("Failed to connect to MongoDB")?;
    let inserted = store.insert_entries(&entries).await?;

    println!("Inserted {} entries into {}", inserted, store.describe());
    Ok(())
}

pub async fn search(args: SearchArgs) -> Result<()> {
    let config = TriageConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let index = load_knowledge_index(&config).await?;
    let retriever = Retriever::new(Arc::new(index));
    let passages = retriever.retrieve(&args.query, args.k).await?;

    if passages.is_empty() {
        println!("No passages found");
        return Ok(());
    }

    for (rank, passage) in passages.iter().enumerate() {
        println!("{}. [{:.4}] {}", rank + 1, passage.score, passage.title);
        println!("   {}", passage.content);
    }
    Ok(())
}

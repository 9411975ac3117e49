// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use std::{env, sync::Arc};
use symptom_triage::{
    api::{start_server, AppState},
    config::TriageConfig,
    generation::{GeminiClient, GenerationClient},
    rag::{load_knowledge_index, Retriever},
    triage::TriageService,
    version,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());

    let config = TriageConfig::from_env();
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    // Requires GEMINI_API_KEY
    let generator: Arc<dyn GenerationClient> = Arc::new(
        GeminiClient::new(&config.generation).context("Failed to create generation client")?,
    );

    let index = load_knowledge_index(&config).await?;
    info!(
        "Knowledge index ready: {} entries ({})",
        index.len(),
        index.embedding_model()
    );

    let retriever = Retriever::new(Arc::new(index));
    let triage = TriageService::new(retriever, generator, config.retrieval.top_k);
    let state = Arc::new(AppState::new(Arc::new(triage)));

    info!("Serving on {}", config.listen_addr());
    start_server(&config.server, state).await
}

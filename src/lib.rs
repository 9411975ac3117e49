// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod generation;
pub mod knowledge;
pub mod rag;
pub mod triage;
pub mod vector;
pub mod version;

// Re-export main types
pub use api::{create_app, start_server, AppState};
pub use config::TriageConfig;
pub use generation::{GeminiClient, GenerationClient, GenerationError};
pub use knowledge::{KnowledgeEntry, KnowledgeStore};
pub use rag::{KnowledgeIndex, RetrievedPassage, Retriever};
pub use triage::{PatientQuery, TriageError, TriageResult, TriageService};

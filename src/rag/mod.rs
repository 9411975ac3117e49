// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// RAG (Retrieval-Augmented Generation) module
// Startup-built knowledge index plus per-request passage retrieval

pub mod errors;
pub mod index_builder;
pub mod loader;
pub mod retriever;

pub use errors::RagError;
pub use index_builder::KnowledgeIndex;
pub use loader::load_knowledge_index;
pub use retriever::{RetrievedPassage, Retriever, DEFAULT_K};

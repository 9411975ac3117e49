// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration loaded from environment variables

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::knowledge::mongo::{DEFAULT_COLLECTION, DEFAULT_DATABASE};
use crate::vector::IndexKind;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TOP_K: usize = 6;
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-mpnet-base-v2";
pub const DEFAULT_HASHING_DIMENSION: usize = 512;
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;

/// Top-level configuration for the triage service
#[derive(Debug, Clone, Default)]
pub struct TriageConfig {
    pub server: ServerConfig,
    pub knowledge: KnowledgeConfig,
    pub embedding: EmbeddingSettings,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where knowledge entries come from
#[derive(Debug, Clone)]
pub struct KnowledgeConfig {
    /// Document store connection string; takes precedence over the file store
    pub mongo_uri: Option<String>,
    pub database: String,
    pub collection: String,
    /// JSON file store; the bundled seed data is used when neither source is set
    pub file_path: Option<PathBuf>,
    /// Load only the first N records
    pub load_limit: Option<usize>,
}

/// Embedding model and index selection
#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub model_name: String,
    pub model_path: Option<PathBuf>,
    pub tokenizer_path: Option<PathBuf>,
    /// Dimension of the hashing embedder used when no ONNX model is configured
    pub hashing_dimension: usize,
    pub index_kind: IndexKind,
}

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Passages retrieved per triage request
    pub top_k: usize,
}

/// Upstream generative-language API settings
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl TriageConfig {
    /// Load configuration from environment variables
    ///
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server: ServerConfig {
                host: env_non_empty("HOST").unwrap_or(defaults.server.host),
                port: env_parse("PORT").unwrap_or(defaults.server.port),
            },
            knowledge: KnowledgeConfig {
                mongo_uri: env_non_empty("MONGO_URI"),
                database: env_non_empty("MONGO_DATABASE").unwrap_or(defaults.knowledge.database),
                collection: env_non_empty("MONGO_COLLECTION")
                    .unwrap_or(defaults.knowledge.collection),
                file_path: env_non_empty("KNOWLEDGE_BASE_PATH").map(PathBuf::from),
                load_limit: env_parse("KNOWLEDGE_LOAD_LIMIT"),
            },
            embedding: EmbeddingSettings {
                model_name: env_non_empty("EMBEDDING_MODEL_NAME")
                    .unwrap_or(defaults.embedding.model_name),
                model_path: env_non_empty("EMBEDDING_MODEL_PATH").map(PathBuf::from),
                tokenizer_path: env_non_empty("EMBEDDING_TOKENIZER_PATH").map(PathBuf::from),
                hashing_dimension: env_parse("HASHING_EMBEDDING_DIM")
                    .unwrap_or(defaults.embedding.hashing_dimension),
                index_kind: env_parse("VECTOR_INDEX").unwrap_or(defaults.embedding.index_kind),
            },
            retrieval: RetrievalConfig {
                top_k: env_parse("RETRIEVAL_TOP_K").unwrap_or(defaults.retrieval.top_k),
            },
            generation: GenerationConfig {
                api_key: env_non_empty("GEMINI_API_KEY"),
                api_base: env_non_empty("GEMINI_API_BASE").unwrap_or(defaults.generation.api_base),
                model: env_non_empty("GEMINI_MODEL").unwrap_or(defaults.generation.model),
                temperature: env_parse("GENERATION_TEMPERATURE")
                    .unwrap_or(defaults.generation.temperature),
                timeout_secs: env_parse("GENERATION_TIMEOUT_SECS")
                    .unwrap_or(defaults.generation.timeout_secs),
            },
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.retrieval.top_k == 0 {
            return Err("RETRIEVAL_TOP_K must be greater than 0".to_string());
        }
        if self.embedding.hashing_dimension == 0 {
            return Err("HASHING_EMBEDDING_DIM must be greater than 0".to_string());
        }
        if self.embedding.model_path.is_some() != self.embedding.tokenizer_path.is_some() {
            return Err(
                "EMBEDDING_MODEL_PATH and EMBEDDING_TOKENIZER_PATH must be set together"
                    .to_string(),
            );
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(format!(
                "GENERATION_TEMPERATURE must be between 0.0 and 2.0, got {}",
                self.generation.temperature
            ));
        }
        if self.generation.timeout_secs == 0 {
            return Err("GENERATION_TIMEOUT_SECS must be greater than 0".to_string());
        }
        if self.knowledge.load_limit == Some(0) {
            return Err("KNOWLEDGE_LOAD_LIMIT must be greater than 0 when set".to_string());
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            mongo_uri: None,
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            file_path: None,
            load_limit: None,
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_EMBEDDING_MODEL.to_string(),
            model_path: None,
            tokenizer_path: None,
            hashing_dimension: DEFAULT_HASHING_DIMENSION,
            index_kind: IndexKind::Flat,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
        }
    }
}

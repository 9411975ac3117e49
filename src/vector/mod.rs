// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Nearest-neighbor indexes over embedding vectors

pub mod flat;
pub mod hnsw;

pub use flat::FlatIndex;
pub use hnsw::HnswIndex;

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

/// One neighbor: position of the vector at build time and its cosine similarity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub score: f32,
}

/// Read-only k-NN index, built once and shared across requests
pub trait VectorIndex: Send + Sync {
    /// Up to `k` neighbors sorted by similarity (highest first)
    ///
    /// No minimum score is applied. An empty index yields an empty result.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn dimensions(&self) -> usize;
}

/// Which index implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Exact cosine search; deterministic
    Flat,
    /// Approximate search via HNSW
    Hnsw,
}

impl FromStr for IndexKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" | "exact" => Ok(IndexKind::Flat),
            "hnsw" => Ok(IndexKind::Hnsw),
            other => Err(format!("unknown vector index '{}'; expected flat or hnsw", other)),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Flat => write!(f, "flat"),
            IndexKind::Hnsw => write!(f, "hnsw"),
        }
    }
}

/// Build an index of the requested kind
pub fn build_index(
    kind: IndexKind,
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
) -> Result<Box<dyn VectorIndex>> {
    match kind {
        IndexKind::Flat => Ok(Box::new(FlatIndex::build(vectors, dimensions)?)),
        IndexKind::Hnsw => Ok(Box::new(HnswIndex::build(vectors, dimensions)?)),
    }
}

/// Check dimensions and reject NaN/Infinity
pub(crate) fn validate_vector(vector: &[f32], dimensions: usize, what: &str) -> Result<()> {
    if vector.len() != dimensions {
        return Err(anyhow!(
            "{} has wrong dimensions: expected {}, got {}",
            what,
            dimensions,
            vector.len()
        ));
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(anyhow!("{} contains NaN or Infinity values", what));
    }
    Ok(())
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        0.0
    } else {
        dot_product / (magnitude_a * magnitude_b)
    }
}

/// Divide by the L2 norm; zero vectors are returned unchanged
pub fn normalize_vector(vector: &[f32]) -> Vec<f32> {
    let magnitude: f32 = vector.iter().map(|&x| x * x).sum::<f32>().sqrt();

    if magnitude == 0.0 || !magnitude.is_finite() {
        return vector.to_vec();
    }

    vector.iter().map(|&x| x / magnitude).collect()
}

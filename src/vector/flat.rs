// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Exact cosine-similarity index
//!
//! Scores every stored vector for each query. For a curated knowledge base of
//! tens to hundreds of entries this is both fast and exact. Ties keep build
//! order, so results are deterministic.

use anyhow::Result;

use super::{normalize_vector, validate_vector, Neighbor, VectorIndex};

#[derive(Debug, Clone)]
pub struct FlatIndex {
    /// Unit-length copies of the indexed vectors, in build order
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl FlatIndex {
    /// Build from vectors that must all have `dimensions` finite components
    pub fn build(vectors: Vec<Vec<f32>>, dimensions: usize) -> Result<Self> {
        for (i, vector) in vectors.iter().enumerate() {
            validate_vector(vector, dimensions, &format!("Vector {}", i))?;
        }

        Ok(Self {
            vectors: vectors.iter().map(|v| normalize_vector(v)).collect(),
            dimensions,
        })
    }
}

impl VectorIndex for FlatIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        validate_vector(query, self.dimensions, "Query")?;

        if self.vectors.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query = normalize_vector(query);

        let mut results: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| Neighbor {
                position,
                score: vector.iter().zip(query.iter()).map(|(a, b)| a * b).sum(),
            })
            .collect();

        // Stable sort keeps build order among equal scores
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        Ok(results)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

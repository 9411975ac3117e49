// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HNSW index for approximate nearest neighbor search
//!
//! Hierarchical Navigable Small World graph over cosine distance, for
//! knowledge bases large enough that exact search is noticeably slow.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use symptom_triage::vector::{HnswIndex, VectorIndex};
//!
//! let index = HnswIndex::build(vectors, 768)?;
//! let neighbors = index.search(&query, 6)?;
//! ```

use anyhow::Result;
use hnsw_rs::hnsw::{Hnsw, Neighbour};
use hnsw_rs::prelude::*;
use std::sync::Arc;

use super::{cosine_similarity, normalize_vector, validate_vector, Neighbor, VectorIndex};

/// Connections per layer (M parameter)
const MAX_NB_CONNECTION: usize = 16;
/// Candidate list size during construction
const EF_CONSTRUCTION: usize = 200;
/// Upper bound on graph layers accepted by hnsw_rs
const MAX_LAYER: usize = 16;

pub struct HnswIndex {
    /// `None` for an empty index
    hnsw: Option<Arc<Hnsw<'static, f32, DistCosine>>>,
    /// Unit-length copies in build order, used to score graph candidates
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl HnswIndex {
    /// Build HNSW index from vectors
    ///
    /// # Errors
    ///
    /// Returns error if any vector has the wrong dimensions or contains
    /// NaN/Infinity values.
    pub fn build(vectors: Vec<Vec<f32>>, dimensions: usize) -> Result<Self> {
        for (i, vector) in vectors.iter().enumerate() {
            validate_vector(vector, dimensions, &format!("Vector {}", i))?;
        }

        if vectors.is_empty() {
            return Ok(Self {
                hnsw: None,
                vectors: Vec::new(),
                dimensions,
            });
        }

        let vectors: Vec<Vec<f32>> = vectors.iter().map(|v| normalize_vector(v)).collect();

        let mut hnsw: Hnsw<f32, DistCosine> = Hnsw::new(
            MAX_NB_CONNECTION,
            vectors.len(),
            MAX_LAYER,
            EF_CONSTRUCTION,
            DistCosine,
        );

        for (position, vector) in vectors.iter().enumerate() {
            hnsw.insert((vector.as_slice(), position));
        }

        hnsw.set_searching_mode(true);

        Ok(Self {
            hnsw: Some(Arc::new(hnsw)),
            vectors,
            dimensions,
        })
    }
}

impl VectorIndex for HnswIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        validate_vector(query, self.dimensions, "Query")?;

        let hnsw = match &self.hnsw {
            Some(hnsw) if k > 0 => hnsw,
            _ => return Ok(Vec::new()),
        };

        // DistCosine reports distance 0 for a zero vector
        if query.iter().all(|&v| v == 0.0) {
            return Ok((0..k.min(self.vectors.len()))
                .map(|position| Neighbor {
                    position,
                    score: 0.0,
                })
                .collect());
        }

        let normalized_query = normalize_vector(query);

        // ef_search should be >= k (typically 1.5-2x k)
        let ef_search = (k * 2).max(50);
        let neighbours: Vec<Neighbour> = hnsw.search(&normalized_query, k, ef_search);

        // Exact cosine against the stored unit vector
        let mut results: Vec<Neighbor> = neighbours
            .into_iter()
            .filter_map(|n| {
                self.vectors.get(n.d_id).map(|stored| Neighbor {
                    position: n.d_id,
                    score: cosine_similarity(stored, &normalized_query),
                })
            })
            .collect();

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

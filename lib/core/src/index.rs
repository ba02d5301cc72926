//! Exact nearest-neighbour index.
//!
//! Vectors are stored row-major in one contiguous buffer; row `i` is the
//! vector of the document at position `i`.

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Distance, Error, QueryError, Result, Vector};

/// Row count above which scoring is split across the rayon pool
const PARALLEL_THRESHOLD: usize = 4096;

/// A single search hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlatIndex {
    dim: usize,
    distance: Distance,
    count: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dim: usize, distance: Distance) -> Self {
        Self {
            dim,
            distance,
            count: 0,
            data: Vec::new(),
        }
    }

    /// Build an index from vectors in position order
    pub fn from_vectors<I>(dim: usize, distance: Distance, vectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vector>,
    {
        let mut index = Self::new(dim, distance);
        for vector in vectors {
            index.add(&vector)?;
        }
        Ok(index)
    }

    /// Append a vector; it receives the next position
    pub fn add(&mut self, vector: &Vector) -> Result<usize> {
        if vector.dim() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: vector.dim(),
            });
        }
        let position = self.count;
        self.data.extend_from_slice(vector.as_slice());
        self.count += 1;
        Ok(position)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn distance(&self) -> Distance {
        self.distance
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        if position >= self.count {
            return None;
        }
        let start = position * self.dim;
        self.data.get(start..start + self.dim)
    }

    /// Check that the buffer holds exactly `len` rows of `dim` floats
    pub fn validate(&self) -> std::result::Result<(), String> {
        let expected = self.count.checked_mul(self.dim).ok_or("row count overflows")?;
        if self.data.len() != expected {
            return Err(format!(
                "buffer of {} floats does not hold {} rows of dimension {}",
                self.data.len(),
                self.count,
                self.dim
            ));
        }
        Ok(())
    }

    /// Search the `k` nearest rows to `query`.
    ///
    /// Results are ordered by ascending distance, ties broken by ascending
    /// position, and never longer than `min(k, len)`.
    pub fn search(&self, query: &Vector, k: usize) -> std::result::Result<Vec<Neighbor>, QueryError> {
        if k == 0 {
            return Err(QueryError::InvalidTopK);
        }
        if query.dim() != self.dim {
            return Err(QueryError::DimensionMismatch {
                expected: self.dim,
                actual: query.dim(),
            });
        }
        if !query.is_finite() {
            return Err(QueryError::DegenerateVector);
        }

        let q = query.as_slice();
        let metric = self.distance;
        let mut scored: Vec<Neighbor> = if self.dim == 0 {
            (0..self.count)
                .map(|position| Neighbor { position, distance: 0.0 })
                .collect()
        } else if self.count >= PARALLEL_THRESHOLD {
            self.data
                .par_chunks_exact(self.dim)
                .enumerate()
                .map(|(position, row)| Neighbor {
                    position,
                    distance: metric.compute(q, row),
                })
                .collect()
        } else {
            self.data
                .chunks_exact(self.dim)
                .enumerate()
                .map(|(position, row)| Neighbor {
                    position,
                    distance: metric.compute(q, row),
                })
                .collect()
        };

        let key = |n: &Neighbor| (OrderedFloat(n.distance), n.position);
        if scored.len() > k {
            scored.select_nth_unstable_by_key(k - 1, key);
            scored.truncate(k);
        }
        scored.sort_unstable_by_key(key);
        Ok(scored)
    }
}

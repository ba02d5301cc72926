//! Distance kernels used by the flat index.
//!
//! Every metric is expressed as a distance: lower means closer, so results
//! can always be ranked ascending regardless of the metric.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Distance {
    /// Squared L2 distance
    #[default]
    Euclidean,
    /// Negated inner product
    Dot,
    /// `1 - cosine similarity`
    Cosine,
}

impl Distance {
    /// Distance between two equally sized slices
    #[inline]
    pub fn compute(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Distance::Euclidean => l2_squared(a, b),
            Distance::Dot => -dot_product(a, b),
            Distance::Cosine => {
                let norm_a = norm(a);
                let norm_b = norm(b);
                if norm_a == 0.0 || norm_b == 0.0 {
                    // Zero vectors are orthogonal to everything
                    return 1.0;
                }
                1.0 - dot_product(a, b) / (norm_a * norm_b)
            }
        }
    }
}

#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
pub fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[inline]
pub fn norm(a: &[f32]) -> f32 {
    dot_product(a, a).sqrt()
}

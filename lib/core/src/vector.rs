use serde::{Deserialize, Serialize};

use crate::distance::norm;

/// A vector of floating point numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// True when every component is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|x| *x == 0.0)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Normalize the vector to unit length. Zero vectors are left untouched.
    #[inline]
    pub fn normalize(&mut self) {
        let norm = norm(&self.data);
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_leaves_zero_vector() {
        let mut v = Vector::zeros(4);
        v.normalize();
        assert!(v.is_zero());

        let mut w = Vector::new(vec![3.0, 4.0]);
        w.normalize();
        assert!((w.as_slice()[0] - 0.6).abs() < 1e-6);
        assert!((w.as_slice()[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_is_finite() {
        assert!(Vector::new(vec![1.0, 2.0]).is_finite());
        assert!(!Vector::new(vec![1.0, f32::NAN]).is_finite());
    }
}

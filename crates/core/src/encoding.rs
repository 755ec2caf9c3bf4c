//! Face encodings and distance-based matching.

use serde::{Deserialize, Serialize};

/// Maximum Euclidean distance at which two encodings are considered the same
/// person. Matches the dlib ResNet model's recommended tolerance.
pub const DEFAULT_MATCH_TOLERANCE: f64 = 0.6;

/// Numeric feature vector describing one detected face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceEncoding {
    pub values: Vec<f64>,
}

impl FaceEncoding {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Euclidean distance to `other`.
    ///
    /// Returns `None` when the encodings have different dimensions, since
    /// they cannot come from the same model.
    pub fn distance(&self, other: &FaceEncoding) -> Option<f64> {
        if self.values.len() != other.values.len() {
            return None;
        }

        let sum: f64 = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum();

        Some(sum.sqrt())
    }
}

/// Decide whether `candidate` is the same face as `known`.
///
/// Empty or dimension-mismatched encodings never match.
pub fn is_match(known: &FaceEncoding, candidate: &FaceEncoding, tolerance: f64) -> bool {
    if known.is_empty() {
        return false;
    }

    match known.distance(candidate) {
        Some(distance) => distance <= tolerance,
        None => false,
    }
}

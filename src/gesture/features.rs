//! Feature Extraction
//!
//! ジェスチャーからモデル入力用の特徴量ベクトルを生成します。

use super::GestureSample;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Number of features per gesture
pub const FEATURE_COUNT: usize = 3;

/// Feature order shared by the builder and every model.
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = ["velocity", "distance", "duration"];

/// 特徴量ベクトル（velocity, distance, duration の順）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// ジェスチャーから特徴量を抽出
    ///
    /// Every field must be finite.
    pub fn from_sample(sample: &GestureSample) -> Result<Self> {
        let values = [sample.velocity, sample.distance, sample.duration];
        for (name, value) in FEATURE_LAYOUT.iter().zip(values.iter()) {
            if !value.is_finite() {
                return Err(Error::InvalidSample(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(Self(values))
    }

    /// Extract every sample, failing on the first invalid one.
    pub fn from_samples(samples: &[GestureSample]) -> Result<Vec<Self>> {
        samples
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Self::from_sample(s).map_err(|e| match e {
                    Error::InvalidSample(msg) => {
                        Error::InvalidSample(format!("sample #{}: {}", i, msg))
                    }
                    other => other,
                })
            })
            .collect()
    }

    /// The zero vector (centroid of a normalized sample)
    pub fn zeros() -> Self {
        Self([0.0; FEATURE_COUNT])
    }

    /// Squared Euclidean distance
    pub fn squared_distance(&self, other: &FeatureVector) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

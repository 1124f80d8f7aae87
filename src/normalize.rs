//! Feature Normalization
//!
//! 学習サンプルから特徴量ごとの平均・標準偏差を求め、標準化を行います。

use crate::error::{Error, Result};
use crate::gesture::{FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::{debug, warn};

/// Smallest standard deviation used for scaling.
///
/// A feature whose population standard deviation falls below this value is
/// scaled by the floor instead, so `transform` never divides by zero.
pub const STD_DEV_FLOOR: f64 = 1e-6;

/// 特徴量1つ分のスケーリングパラメータ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureScale {
    /// 平均値
    pub mean: f64,
    /// 標準偏差（常に STD_DEV_FLOOR 以上）
    pub std_dev: f64,
    /// 標準偏差がフロアで置き換えられたか
    #[serde(default)]
    pub floored: bool,
}

/// 正規化パラメータ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParameters {
    pub features: [FeatureScale; FEATURE_COUNT],
}

impl NormalizationParameters {
    /// Fit mean and population standard deviation per feature.
    pub fn fit(samples: &[FeatureVector]) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::insufficient(1, 0));
        }

        let mut features = [FeatureScale {
            mean: 0.0,
            std_dev: STD_DEV_FLOOR,
            floored: true,
        }; FEATURE_COUNT];

        for (i, scale) in features.iter_mut().enumerate() {
            let column: Vec<f64> = samples.iter().map(|v| v[i]).collect();
            let mean = column.iter().mean();
            let std_dev = column.iter().population_std_dev();

            if !mean.is_finite() || !std_dev.is_finite() {
                return Err(Error::InvalidSample(format!(
                    "{} statistics are not finite",
                    FEATURE_LAYOUT[i]
                )));
            }

            let floored = std_dev < STD_DEV_FLOOR;
            if floored {
                warn!(
                    "Feature '{}' has no spread (std={:.3e}); scaling by floor {:.0e}",
                    FEATURE_LAYOUT[i], std_dev, STD_DEV_FLOOR
                );
            }

            *scale = FeatureScale {
                mean,
                std_dev: if floored { STD_DEV_FLOOR } else { std_dev },
                floored,
            };
        }

        debug!(
            "Fitted normalization on {} samples: {:?}",
            samples.len(),
            features
        );
        Ok(Self { features })
    }

    /// `(x - mean) / std_dev` per feature
    pub fn transform(&self, vector: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, scale) in self.features.iter().enumerate() {
            out[i] = (vector[i] - scale.mean) / scale.std_dev;
        }
        FeatureVector(out)
    }

    pub fn transform_all(&self, vectors: &[FeatureVector]) -> Vec<FeatureVector> {
        vectors.iter().map(|v| self.transform(v)).collect()
    }

    /// Check parameters that did not come from `fit` (e.g. a loaded artifact).
    pub fn validate(&self) -> Result<()> {
        for (scale, name) in self.features.iter().zip(FEATURE_LAYOUT) {
            if !scale.mean.is_finite() {
                return Err(Error::DegenerateModel(format!(
                    "{} mean is not finite: {}",
                    name, scale.mean
                )));
            }
            if !(scale.std_dev.is_finite() && scale.std_dev >= STD_DEV_FLOOR) {
                return Err(Error::DegenerateModel(format!(
                    "{} std_dev must be at least {:.0e}, got {}",
                    name, STD_DEV_FLOOR, scale.std_dev
                )));
            }
        }
        Ok(())
    }

    /// True when no feature has any spread.
    pub fn all_floored(&self) -> bool {
        self.features.iter().all(|f| f.floored)
    }

    pub fn mean(&self, index: usize) -> f64 {
        self.features[index].mean
    }
}

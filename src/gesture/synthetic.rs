//! Synthetic Gestures
//!
//! シード固定の正規分布からジェスチャーを生成します（テスト・ベンチマーク・デモ用）。

use super::GestureSample;
use crate::error::{Error, Result};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;

/// The canned attacker swipe the capture app injects for its bot demo.
pub const BOT_GESTURE: GestureSample = GestureSample {
    velocity: 2000.0,
    distance: 500.0,
    duration: 250.0,
};

/// 正規分布パラメータ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureDistribution {
    pub mean: f64,
    pub std_dev: f64,
}

impl FeatureDistribution {
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    fn normal(&self, name: &str) -> Result<Normal> {
        Normal::new(self.mean, self.std_dev).map_err(|e| {
            Error::Config(format!(
                "invalid {} distribution N({}, {}): {}",
                name, self.mean, self.std_dev, e
            ))
        })
    }
}

/// ユーザーのスワイプ傾向
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureDistribution {
    pub velocity: FeatureDistribution,
    pub distance: FeatureDistribution,
    pub duration: FeatureDistribution,
}

impl Default for GestureDistribution {
    /// velocity ~ N(500, 50), distance ~ N(150, 20), duration ~ N(500, 50)
    fn default() -> Self {
        Self {
            velocity: FeatureDistribution::new(500.0, 50.0),
            distance: FeatureDistribution::new(150.0, 20.0),
            duration: FeatureDistribution::new(500.0, 50.0),
        }
    }
}

impl GestureDistribution {
    /// `count` 件のジェスチャーを生成
    ///
    /// The same seed always yields the same sequence. Negative draws are
    /// clamped to zero since none of the measurements can be negative.
    pub fn generate(&self, count: usize, seed: u64) -> Result<Vec<GestureSample>> {
        let velocity = self.velocity.normal("velocity")?;
        let distance = self.distance.normal("distance")?;
        let duration = self.duration.normal("duration")?;
        let mut rng = StdRng::seed_from_u64(seed);

        Ok((0..count)
            .map(|_| {
                GestureSample::new(
                    velocity.sample(&mut rng).max(0.0),
                    distance.sample(&mut rng).max(0.0),
                    duration.sample(&mut rng).max(0.0),
                )
            })
            .collect())
    }
}

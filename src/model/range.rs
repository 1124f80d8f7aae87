//! Statistical Range Model
//!
//! 速度・距離の平均 ± k·標準偏差 に収まるかで判定する統計モデル。
//!
//! Duration is not part of the bounds check; only motion dynamics
//! (velocity, distance) are compared.

use super::{GestureModel, ModelKind};
use crate::config::EngineConfig;
use crate::engine::verdict::{risk_score, Diagnostics, Verdict, VerdictLabel};
use crate::error::{Error, Result};
use crate::gesture::{FeatureVector, GestureSample};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::{debug, info, warn};

/// 範囲チェック結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeCheck {
    pub velocity_within: bool,
    pub distance_within: bool,
}

impl RangeCheck {
    pub fn is_within(&self) -> bool {
        self.velocity_within && self.distance_within
    }
}

/// 統計レンジモデル
///
/// Stores raw means and standard deviations; the width `k` is applied when
/// scoring so it can be re-tuned without refitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeModel {
    /// 速度の平均
    pub velocity_mean: f64,
    /// 速度の標準偏差
    pub velocity_std_dev: f64,
    /// 距離の平均
    pub distance_mean: f64,
    /// 距離の標準偏差
    pub distance_std_dev: f64,
    /// 観測最小速度 - 標準偏差（参考値、判定には使わない）
    pub velocity_lower_bound: f64,
    /// 観測最大速度 + 標準偏差（参考値、判定には使わない）
    pub velocity_upper_bound: f64,
    /// トレーニングサンプル数
    pub sample_count: usize,
}

impl RangeModel {
    /// 生の計測値から学習
    pub fn from_samples(samples: &[GestureSample], recommended_samples: usize) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::insufficient(1, 0));
        }
        FeatureVector::from_samples(samples)?;

        if samples.len() < recommended_samples {
            warn!(
                "Range model trained on {} swipes; {} or more give stable bounds",
                samples.len(),
                recommended_samples
            );
        }

        let velocities: Vec<f64> = samples.iter().map(|s| s.velocity).collect();
        let distances: Vec<f64> = samples.iter().map(|s| s.distance).collect();

        let velocity_std_dev = velocities.iter().population_std_dev();
        let model = Self {
            velocity_mean: velocities.iter().mean(),
            velocity_std_dev,
            distance_mean: distances.iter().mean(),
            distance_std_dev: distances.iter().population_std_dev(),
            velocity_lower_bound: Statistics::min(velocities.iter()) - velocity_std_dev,
            velocity_upper_bound: Statistics::max(velocities.iter()) + velocity_std_dev,
            sample_count: samples.len(),
        };

        if model.velocity_std_dev == 0.0 || model.distance_std_dev == 0.0 {
            warn!("Range model has a zero-width band; only exact matches will pass");
        }

        info!(
            "Range model trained on {} swipes: velocity {:.0} ± {:.0} px/s, distance {:.0} ± {:.0} px",
            model.sample_count,
            model.velocity_mean,
            model.velocity_std_dev,
            model.distance_mean,
            model.distance_std_dev
        );
        Ok(model)
    }

    /// 許容帯 `mean ± width·std` の (下限, 上限)（速度）
    pub fn velocity_band(&self, width: f64) -> (f64, f64) {
        band(self.velocity_mean, self.velocity_std_dev, width)
    }

    /// 許容帯 `mean ± width·std` の (下限, 上限)（距離）
    pub fn distance_band(&self, width: f64) -> (f64, f64) {
        band(self.distance_mean, self.distance_std_dev, width)
    }

    /// 速度・距離がそれぞれ許容帯に入っているか
    pub fn score(&self, sample: &GestureSample, width: f64) -> Result<RangeCheck> {
        if !(width.is_finite() && width > 0.0) {
            return Err(Error::Config(format!(
                "range.width must be positive, got {}",
                width
            )));
        }
        FeatureVector::from_sample(sample)?;
        let (v_lo, v_hi) = self.velocity_band(width);
        let (d_lo, d_hi) = self.distance_band(width);
        Ok(RangeCheck {
            velocity_within: (v_lo..=v_hi).contains(&sample.velocity),
            distance_within: (d_lo..=d_hi).contains(&sample.distance),
        })
    }

    /// Check statistics that did not come from `from_samples` (e.g. a loaded
    /// artifact). A zero standard deviation is legal here.
    pub fn validate(&self) -> Result<()> {
        let stats = [
            ("velocity_mean", self.velocity_mean),
            ("distance_mean", self.distance_mean),
            ("velocity_lower_bound", self.velocity_lower_bound),
            ("velocity_upper_bound", self.velocity_upper_bound),
        ];
        if let Some((name, value)) = stats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::DegenerateModel(format!(
                "{} is not finite: {}",
                name, value
            )));
        }
        for (name, std_dev) in [
            ("velocity_std_dev", self.velocity_std_dev),
            ("distance_std_dev", self.distance_std_dev),
        ] {
            if !(std_dev.is_finite() && std_dev >= 0.0) {
                return Err(Error::DegenerateModel(format!(
                    "{} must be finite and non-negative, got {}",
                    name, std_dev
                )));
            }
        }
        if self.sample_count == 0 {
            return Err(Error::DegenerateModel("sample_count is 0".to_string()));
        }
        Ok(())
    }

    pub fn is_within_range(&self, sample: &GestureSample, width: f64) -> Result<bool> {
        Ok(self.score(sample, width)?.is_within())
    }
}

fn band(mean: f64, std_dev: f64, width: f64) -> (f64, f64) {
    (mean - width * std_dev, mean + width * std_dev)
}

impl GestureModel for RangeModel {
    const KIND: ModelKind = ModelKind::Range;

    fn fit(samples: &[GestureSample], config: &EngineConfig) -> Result<Self> {
        config.range.validate()?;
        RangeModel::from_samples(samples, config.range.recommended_samples)
    }

    fn decide(&self, sample: &GestureSample, config: &EngineConfig) -> Result<Verdict> {
        let check = self.score(sample, config.range.width)?;
        let label = VerdictLabel::from_inside(check.is_within());
        debug!(
            "Range decision: velocity={} distance={} -> {} ({:?})",
            sample.velocity, sample.distance, label, check
        );

        Ok(Verdict {
            label,
            confidence: 0.0,
            diagnostics: Diagnostics {
                model_kind: ModelKind::Range,
                margin: None,
                range_check: Some(check),
                risk_score: risk_score(sample.velocity, self.velocity_mean),
            },
        })
    }

    fn sample_count(&self) -> usize {
        self.sample_count
    }
}

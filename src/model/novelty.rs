//! Novelty-Detection Model
//!
//! 正規化済み特徴量に One-Class SVM（RBFカーネル）を当てはめ、
//! 学習分布の境界からの符号付き距離で判定するモデル。

use super::svm::{OneClassSvm, SolverParams};
use super::{GestureModel, ModelKind};
use crate::config::{EngineConfig, KernelBandwidth, NoveltyConfig};
use crate::engine::verdict::{risk_score, Diagnostics, Verdict, VerdictLabel};
use crate::error::{Error, Result};
use crate::gesture::{FeatureVector, GestureSample, FEATURE_COUNT};
use crate::normalize::NormalizationParameters;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::{debug, info};

/// 境界判定の結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoveltyPrediction {
    /// 境界の内側か（margin > 0）
    pub inside: bool,
    /// 境界からの符号付き距離
    pub margin: f64,
}

/// ノベルティ検知モデル
///
/// Carries the normalization it was trained with; the two are never used
/// apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoveltyModel {
    /// 学習時の正規化パラメータ
    pub normalization: NormalizationParameters,
    /// 学習済み境界
    pub boundary: OneClassSvm,
    /// 学習時の ν
    pub nu: f64,
    /// トレーニングサンプル数
    pub sample_count: usize,
}

impl NoveltyModel {
    /// 生の計測値から学習（正規化 → One-Class SVM）
    pub fn from_samples(samples: &[GestureSample], config: &NoveltyConfig) -> Result<Self> {
        config.validate()?;
        let required = config.min_samples.max(1);
        if samples.len() < required {
            return Err(Error::insufficient(required, samples.len()));
        }

        let vectors = FeatureVector::from_samples(samples)?;
        let normalization = NormalizationParameters::fit(&vectors)?;
        if normalization.all_floored() {
            return Err(Error::DegenerateModel(
                "training swipes have no spread in any feature".to_string(),
            ));
        }

        let normalized = normalization.transform_all(&vectors);
        let gamma = kernel_gamma(config.kernel_bandwidth, &normalized);

        let boundary = OneClassSvm::fit(
            &normalized,
            SolverParams {
                nu: config.nu,
                gamma,
                tolerance: config.tolerance,
                max_iterations: config.max_iterations,
            },
        )?;

        info!(
            "Novelty model trained on {} swipes: nu={}, gamma={:.4}, {} support vectors",
            samples.len(),
            config.nu,
            gamma,
            boundary.support_vectors.len()
        );

        Ok(Self {
            normalization,
            boundary,
            nu: config.nu,
            sample_count: samples.len(),
        })
    }

    /// 正規化済みベクトルに対する判定
    pub fn predict(&self, normalized: &FeatureVector) -> NoveltyPrediction {
        let margin = self.boundary.decision_function(normalized);
        NoveltyPrediction {
            inside: margin > 0.0,
            margin,
        }
    }

    /// 生のジェスチャーに対する符号付き距離
    pub fn margin(&self, sample: &GestureSample) -> Result<f64> {
        let vector = FeatureVector::from_sample(sample)?;
        Ok(self.predict(&self.normalization.transform(&vector)).margin)
    }

    /// Check a model that did not come from `from_samples` (e.g. a loaded
    /// artifact).
    pub fn validate(&self) -> Result<()> {
        self.normalization.validate()?;
        self.boundary.validate()?;
        if !(self.nu > 0.0 && self.nu <= 1.0) {
            return Err(Error::DegenerateModel(format!(
                "nu must be in (0, 1], got {}",
                self.nu
            )));
        }
        Ok(())
    }

    pub fn gamma(&self) -> f64 {
        self.boundary.gamma
    }
}

/// Resolve the RBF bandwidth for a normalized training matrix.
pub fn kernel_gamma(bandwidth: KernelBandwidth, normalized: &[FeatureVector]) -> f64 {
    match bandwidth {
        KernelBandwidth::Fixed(gamma) => gamma,
        KernelBandwidth::Auto => 1.0 / FEATURE_COUNT as f64,
        KernelBandwidth::Scale => {
            let variance = normalized
                .iter()
                .flat_map(|v| v.0.iter())
                .population_variance();
            if variance > 0.0 && variance.is_finite() {
                1.0 / (FEATURE_COUNT as f64 * variance)
            } else {
                1.0
            }
        }
    }
}

impl GestureModel for NoveltyModel {
    const KIND: ModelKind = ModelKind::Novelty;

    fn fit(samples: &[GestureSample], config: &EngineConfig) -> Result<Self> {
        NoveltyModel::from_samples(samples, &config.novelty)
    }

    fn decide(&self, sample: &GestureSample, _config: &EngineConfig) -> Result<Verdict> {
        let vector = FeatureVector::from_sample(sample)?;
        let normalized = self.normalization.transform(&vector);
        let prediction = self.predict(&normalized);
        let label = VerdictLabel::from_inside(prediction.inside);

        debug!(
            "Novelty decision: normalized={:?} margin={:.4} -> {}",
            normalized.0, prediction.margin, label
        );

        Ok(Verdict {
            label,
            confidence: prediction.margin.abs(),
            diagnostics: Diagnostics {
                model_kind: ModelKind::Novelty,
                margin: Some(prediction.margin),
                range_check: None,
                risk_score: risk_score(sample.velocity, self.normalization.mean(0)),
            },
        })
    }

    fn sample_count(&self) -> usize {
        self.sample_count
    }
}

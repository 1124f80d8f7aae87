//! Decision Engine
//!
//! 学習済みモデルを保持し、ジェスチャーごとに ALLOW / BLOCK を判定します。
//!
//! ## 使用例
//!
//! ```rust,no_run
//! use swipe_auth::{engine, EngineConfig, ModelKind, TrainingDataset};
//!
//! # fn example() -> swipe_auth::Result<()> {
//! let dataset = TrainingDataset::read_from("swipeauth_data_1760000000000.json")?;
//! let samples = dataset.samples()?;
//!
//! let training = engine::train(&samples, ModelKind::Novelty, &EngineConfig::default())?;
//! let verdict = training.engine.decide(1500.0, 600.0, 200.0)?;
//! if !verdict.is_allowed() {
//!     println!("blocked, confidence={:.3}", verdict.confidence);
//! }
//! # Ok(())
//! # }
//! ```

pub mod scenarios;
pub mod verdict;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::gesture::GestureSample;
use crate::model::{Model, ModelArtifact, ModelKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use scenarios::{profile_scenarios, Scenario, ScenarioOutcome};
pub use verdict::{Diagnostics, Verdict, VerdictLabel};

/// 判定エンジン
///
/// Holds an immutable fitted model; `decide` takes `&self` and performs no
/// I/O, so one engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    model: Model,
    config: EngineConfig,
}

/// 学習データ上での判定結果の集計
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub model_kind: ModelKind,
    pub sample_count: usize,
    /// 学習データのうち ALLOW と判定された数
    pub allowed: usize,
    /// 学習データのうち BLOCK と判定された数
    pub blocked: usize,
}

impl TrainingReport {
    /// ALLOW の割合（0.0-1.0）
    pub fn allow_rate(&self) -> f64 {
        if self.sample_count == 0 {
            0.0
        } else {
            self.allowed as f64 / self.sample_count as f64
        }
    }
}

/// 学習結果
#[derive(Debug, Clone)]
pub struct Training {
    pub engine: DecisionEngine,
    pub report: TrainingReport,
}

/// モデルを学習し、学習データ自身で評価する
///
/// Training errors are returned as-is; there is no fallback model.
pub fn train(samples: &[GestureSample], kind: ModelKind, config: &EngineConfig) -> Result<Training> {
    info!("Training {} model on {} swipes", kind, samples.len());
    let model = Model::fit(kind, samples, config)?;
    let engine = DecisionEngine::new(model, config.clone())?;
    let report = engine.evaluate(samples)?;

    info!(
        "Training data: {} allowed, {} blocked ({:.1}% allowed)",
        report.allowed,
        report.blocked,
        report.allow_rate() * 100.0
    );
    Ok(Training { engine, report })
}

impl DecisionEngine {
    /// 設定を検証してエンジンを構築
    ///
    /// Callers that skip `EngineConfig::load` still get `Error::Config` for
    /// out-of-range values here instead of a verdict from a broken band.
    pub fn new(model: Model, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { model, config })
    }

    /// アーティファクトからエンジンを復元
    pub fn from_artifact(artifact: ModelArtifact, config: EngineConfig) -> Result<Self> {
        Self::new(artifact.model, config)
    }

    pub fn to_artifact(&self) -> ModelArtifact {
        ModelArtifact::new(self.model.clone())
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn kind(&self) -> ModelKind {
        self.model.kind()
    }

    /// 1回のスワイプを判定
    pub fn decide(&self, velocity: f64, distance: f64, duration: f64) -> Result<Verdict> {
        self.decide_sample(&GestureSample::new(velocity, distance, duration))
    }

    pub fn decide_sample(&self, sample: &GestureSample) -> Result<Verdict> {
        let verdict = self.model.decide(sample, &self.config)?;
        debug!(
            "{} verdict {} (confidence {:.3}) for {:?}",
            self.model.kind(),
            verdict.label,
            verdict.confidence,
            sample
        );
        Ok(verdict)
    }

    /// 複数サンプルを判定して ALLOW / BLOCK を集計
    pub fn evaluate(&self, samples: &[GestureSample]) -> Result<TrainingReport> {
        let mut allowed = 0;
        for sample in samples {
            if self.decide_sample(sample)?.is_allowed() {
                allowed += 1;
            }
        }
        Ok(TrainingReport {
            model_kind: self.kind(),
            sample_count: samples.len(),
            allowed,
            blocked: samples.len() - allowed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::gesture::synthetic::GestureDistribution;

    fn samples() -> Vec<GestureSample> {
        GestureDistribution::default().generate(50, 2024).unwrap()
    }

    #[test]
    fn test_train_report_counts() {
        let samples = samples();
        let training = train(&samples, ModelKind::Novelty, &EngineConfig::default()).unwrap();
        let report = training.report;
        assert_eq!(report.sample_count, 50);
        assert_eq!(report.allowed + report.blocked, 50);
        // nu = 0.3 bounds the fraction of training swipes left outside
        assert!(report.allow_rate() >= 0.5);
    }

    #[test]
    fn test_decide_is_deterministic() {
        let training = train(&samples(), ModelKind::Novelty, &EngineConfig::default()).unwrap();
        let a = training.engine.decide(620.0, 170.0, 450.0).unwrap();
        let b = training.engine.decide(620.0, 170.0, 450.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_live_gesture_is_error_not_block() {
        let training = train(&samples(), ModelKind::Range, &EngineConfig::default()).unwrap();
        let result = training.engine.decide(500.0, f64::NAN, 400.0);
        assert!(matches!(result, Err(Error::InvalidSample(_))));
    }

    #[test]
    fn test_range_width_is_read_at_decision_time() {
        let training = train(&samples(), ModelKind::Range, &EngineConfig::default()).unwrap();
        let Model::Range(range) = training.engine.model().clone() else {
            panic!("expected range model");
        };
        let velocity = range.velocity_mean + 1.5 * range.velocity_std_dev;
        let distance = range.distance_mean;

        let mut narrow = EngineConfig::default();
        narrow.range.width = 1.0;
        let strict = DecisionEngine::new(Model::Range(range), narrow).unwrap();

        assert!(training.engine.decide(velocity, distance, 500.0).unwrap().is_allowed());
        assert!(!strict.decide(velocity, distance, 500.0).unwrap().is_allowed());
    }

    #[test]
    fn test_unvalidated_config_rejected() {
        let training = train(&samples(), ModelKind::Range, &EngineConfig::default()).unwrap();
        let model = training.engine.model().clone();

        let mut config = EngineConfig::default();
        config.range.width = f64::NAN;
        assert!(matches!(
            DecisionEngine::new(model.clone(), config.clone()),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            DecisionEngine::from_artifact(ModelArtifact::new(model), config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_empty_training_fails() {
        for kind in ModelKind::ALL {
            let err = train(&[], kind, &EngineConfig::default()).unwrap_err();
            assert!(matches!(err, Error::InsufficientData { .. }));
        }
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DecisionEngine>();
    }
}

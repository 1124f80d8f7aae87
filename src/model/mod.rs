//! Gesture Models
//!
//! 2種類の判定モデル（統計レンジ / ノベルティ検知）。
//!
//! ## 主要機能
//!
//! - **統計レンジモデル**: 速度・距離の平均 ± k·σ による透明な判定
//! - **ノベルティ検知モデル**: One-Class SVM による3特徴量の同時分布の境界
//! - **モデルアーティファクト**: バージョン付き・タグ付きのシリアライズ形式
//!
//! Both variants implement [`GestureModel`]; [`Model`] is the tagged union the
//! engine and the artifact format work with.

pub mod artifact;
pub mod novelty;
pub mod range;
pub mod svm;

use crate::config::EngineConfig;
use crate::engine::verdict::Verdict;
use crate::error::{Error, Result};
use crate::gesture::GestureSample;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use artifact::{ModelArtifact, SCHEMA_VERSION};
pub use novelty::{NoveltyModel, NoveltyPrediction};
pub use range::{RangeCheck, RangeModel};
pub use svm::OneClassSvm;

/// モデル種別（アーティファクトのタグと一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// 統計レンジモデル
    Range,
    /// ノベルティ検知モデル
    Novelty,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::Range, ModelKind::Novelty];

    /// Artifact tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Range => "range",
            ModelKind::Novelty => "novelty",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnsupportedModelVariant(format!("unknown model type `{}`", s)))
    }
}

/// 判定モデルの共通インターフェース
pub trait GestureModel: Sized {
    /// Variant tag of this model
    const KIND: ModelKind;

    /// 学習サンプルからモデルを構築
    fn fit(samples: &[GestureSample], config: &EngineConfig) -> Result<Self>;

    /// 1回のジェスチャーを判定
    fn decide(&self, sample: &GestureSample, config: &EngineConfig) -> Result<Verdict>;

    /// トレーニングサンプル数
    fn sample_count(&self) -> usize;
}

/// 学習済みモデル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Model {
    Range(RangeModel),
    Novelty(NoveltyModel),
}

impl Model {
    /// 指定種別のモデルを学習
    pub fn fit(kind: ModelKind, samples: &[GestureSample], config: &EngineConfig) -> Result<Self> {
        match kind {
            ModelKind::Range => RangeModel::fit(samples, config).map(Model::Range),
            ModelKind::Novelty => NoveltyModel::fit(samples, config).map(Model::Novelty),
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Range(_) => RangeModel::KIND,
            Model::Novelty(_) => NoveltyModel::KIND,
        }
    }

    pub fn decide(&self, sample: &GestureSample, config: &EngineConfig) -> Result<Verdict> {
        match self {
            Model::Range(model) => model.decide(sample, config),
            Model::Novelty(model) => model.decide(sample, config),
        }
    }

    /// Check fitted parameters, e.g. after loading an artifact.
    pub fn validate(&self) -> Result<()> {
        match self {
            Model::Range(model) => model.validate(),
            Model::Novelty(model) => model.validate(),
        }
    }

    pub fn sample_count(&self) -> usize {
        match self {
            Model::Range(model) => model.sample_count(),
            Model::Novelty(model) => model.sample_count(),
        }
    }
}

impl From<RangeModel> for Model {
    fn from(model: RangeModel) -> Self {
        Model::Range(model)
    }
}

impl From<NoveltyModel> for Model {
    fn from(model: NoveltyModel) -> Self {
        Model::Novelty(model)
    }
}

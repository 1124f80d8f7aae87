//! Model Artifact
//!
//! 学習済みモデルのシリアライズ形式（JSON）。
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "trained_at": "2026-10-16T09:00:00Z",
//!   "model": { "type": "range", "velocity_mean": 537.0, ... }
//! }
//! ```
//!
//! The schema version and the `type` tag are checked before the model body is
//! deserialized, so artifacts written by a newer build fail with
//! `UnsupportedModelVariant` instead of a parse error. Fitted parameters are
//! validated after parsing; an edited or corrupted model is `DegenerateModel`.

use super::{Model, ModelKind};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Current artifact schema version
pub const SCHEMA_VERSION: u32 = 1;

/// モデルアーティファクト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// スキーマバージョン
    pub schema_version: u32,
    /// 学習日時
    pub trained_at: DateTime<Utc>,
    /// 学習済みモデル（`type` タグ付き）
    pub model: Model,
}

impl ModelArtifact {
    pub fn new(model: Model) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            trained_at: Utc::now(),
            model,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.model.kind()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// バージョンとタグを検証してから読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;

        let version = value
            .get("schema_version")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::UnsupportedModelVariant("missing schema_version".to_string()))?;
        if version == 0 || version > u64::from(SCHEMA_VERSION) {
            return Err(Error::UnsupportedModelVariant(format!(
                "schema version {} (supported: 1..={})",
                version, SCHEMA_VERSION
            )));
        }

        let tag = value
            .get("model")
            .and_then(|model| model.get("type"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::UnsupportedModelVariant("missing model type tag".to_string()))?;
        tag.parse::<ModelKind>()?;

        let artifact: Self = serde_json::from_value(value)?;
        artifact.model.validate()?;
        Ok(artifact)
    }

    /// ファイルに書き出し
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        info!("Saved {} model artifact to {}", self.kind(), path.display());
        Ok(())
    }

    /// ファイルから読み込み
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }
}

impl From<Model> for ModelArtifact {
    fn from(model: Model) -> Self {
        Self::new(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::gesture::GestureSample;

    fn range_artifact() -> ModelArtifact {
        let samples = vec![
            GestureSample::new(450.0, 130.0, 480.0),
            GestureSample::new(500.0, 150.0, 500.0),
            GestureSample::new(550.0, 170.0, 520.0),
        ];
        Model::fit(ModelKind::Range, &samples, &EngineConfig::default())
            .unwrap()
            .into()
    }

    #[test]
    fn test_json_round_trip() {
        let artifact = range_artifact();
        let json = artifact.to_json().unwrap();
        assert!(json.contains("\"type\": \"range\""));
        assert_eq!(ModelArtifact::from_json(&json).unwrap(), artifact);
    }

    #[test]
    fn test_unknown_tag() {
        let mut value = serde_json::to_value(range_artifact()).unwrap();
        value["model"]["type"] = Value::from("isolation_forest");
        let err = ModelArtifact::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedModelVariant(_)));
        assert!(err.to_string().contains("isolation_forest"));
    }

    #[test]
    fn test_newer_schema_version() {
        let mut value = serde_json::to_value(range_artifact()).unwrap();
        value["schema_version"] = Value::from(SCHEMA_VERSION + 1);
        assert!(matches!(
            ModelArtifact::from_json(&value.to_string()),
            Err(Error::UnsupportedModelVariant(_))
        ));
    }

    #[test]
    fn test_missing_tag() {
        let json = r#"{"schema_version": 1, "trained_at": "2026-10-16T09:00:00Z", "model": {}}"#;
        assert!(matches!(
            ModelArtifact::from_json(json),
            Err(Error::UnsupportedModelVariant(_))
        ));
    }

    fn novelty_json() -> Value {
        let samples = crate::gesture::synthetic::GestureDistribution::default()
            .generate(40, 8)
            .unwrap();
        let model = Model::fit(ModelKind::Novelty, &samples, &EngineConfig::default()).unwrap();
        serde_json::to_value(ModelArtifact::new(model)).unwrap()
    }

    fn assert_degenerate(value: &Value) {
        assert!(matches!(
            ModelArtifact::from_json(&value.to_string()),
            Err(Error::DegenerateModel(_))
        ));
    }

    #[test]
    fn test_tampered_novelty_parameters_rejected() {
        let mut negative_gamma = novelty_json();
        negative_gamma["model"]["boundary"]["gamma"] = Value::from(-1.0);
        assert_degenerate(&negative_gamma);

        let mut zero_scale = novelty_json();
        zero_scale["model"]["normalization"]["features"][0]["std_dev"] = Value::from(0.0);
        assert_degenerate(&zero_scale);

        let mut negative_coef = novelty_json();
        negative_coef["model"]["boundary"]["dual_coef"][0] = Value::from(-0.5);
        assert_degenerate(&negative_coef);

        let mut short_coef = novelty_json();
        short_coef["model"]["boundary"]["dual_coef"]
            .as_array_mut()
            .unwrap()
            .pop();
        assert_degenerate(&short_coef);
    }

    #[test]
    fn test_tampered_range_parameters_rejected() {
        let mut value = serde_json::to_value(range_artifact()).unwrap();
        value["model"]["velocity_std_dev"] = Value::from(-25.0);
        assert_degenerate(&value);
    }

    #[test]
    fn test_malformed_body_is_json_error() {
        let json = r#"{"schema_version": 1, "trained_at": "2026-10-16T09:00:00Z",
                       "model": {"type": "range", "velocity_mean": "fast"}}"#;
        assert!(matches!(ModelArtifact::from_json(json), Err(Error::Json(_))));
    }
}

//! Training Dataset
//!
//! キャプチャアプリがエクスポートする学習データ（JSON）の定義と検証。
//!
//! ```json
//! {
//!   "userProfile": {"avgVelocity": 537, "avgDistance": 161, "totalSwipes": 2},
//!   "swipeHistory": [
//!     {"x": 310, "y": 220, "distance": 161, "velocity": 537, "duration": 300,
//!      "timestamp": "10:42:01", "risk": 0.1, "mlPrediction": "ALLOW"}
//!   ],
//!   "exportDate": "2026-10-01T10:42:30.000Z",
//!   "totalSwipes": 2
//! }
//! ```

use super::{GestureSample, UserProfile};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// `swipeHistory` の1エントリ
///
/// The capture app writes display fields (`x`, `y`, `timestamp`, `risk`,
/// `mlPrediction`, ...) next to the measurements; those are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwipeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl SwipeRecord {
    /// 計測値をサンプルに変換
    pub fn to_sample(&self) -> Result<GestureSample> {
        let field = |value: Option<f64>, name: &str| {
            value.ok_or_else(|| Error::InvalidSample(format!("missing field `{}`", name)))
        };
        Ok(GestureSample::new(
            field(self.velocity, "velocity")?,
            field(self.distance, "distance")?,
            field(self.duration, "duration")?,
        ))
    }
}

impl From<GestureSample> for SwipeRecord {
    fn from(sample: GestureSample) -> Self {
        Self {
            velocity: Some(sample.velocity),
            distance: Some(sample.distance),
            duration: Some(sample.duration),
        }
    }
}

/// エクスポートされた学習データ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDataset {
    /// ユーザープロファイル
    #[serde(default)]
    pub user_profile: UserProfile,
    /// スワイプ履歴
    pub swipe_history: Vec<SwipeRecord>,
    /// エクスポート日時
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
    /// 総スワイプ数（エクスポート時点）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_swipes: Option<usize>,
}

impl TrainingDataset {
    /// Build a dataset in the capture-app layout from already-measured samples.
    pub fn from_samples(samples: &[GestureSample]) -> Self {
        Self {
            user_profile: UserProfile::from_samples(samples),
            swipe_history: samples.iter().copied().map(SwipeRecord::from).collect(),
            export_date: Some(Utc::now()),
            total_swipes: Some(samples.len()),
        }
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: Self = serde_json::from_str(json)?;
        debug!(
            "Parsed dataset with {} swipe records",
            dataset.swipe_history.len()
        );
        Ok(dataset)
    }

    /// ファイルから読み込み
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 全レコードを検証してサンプル列に変換
    ///
    /// Order is preserved. The first invalid record fails the whole
    /// conversion; an empty history is `InsufficientData`.
    pub fn samples(&self) -> Result<Vec<GestureSample>> {
        if self.swipe_history.is_empty() {
            return Err(Error::insufficient(1, 0));
        }

        if let Some(total) = self.total_swipes {
            if total != self.swipe_history.len() {
                warn!(
                    "Dataset header reports {} swipes but history holds {}",
                    total,
                    self.swipe_history.len()
                );
            }
        }

        self.swipe_history
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let sample = record.to_sample().map_err(|e| match e {
                    Error::InvalidSample(msg) => {
                        Error::InvalidSample(format!("swipe #{}: {}", i, msg))
                    }
                    other => other,
                })?;
                if !(sample.velocity.is_finite()
                    && sample.distance.is_finite()
                    && sample.duration.is_finite())
                {
                    return Err(Error::InvalidSample(format!(
                        "swipe #{}: non-finite measurement",
                        i
                    )));
                }
                Ok(sample)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "userProfile": {"avgVelocity": 537, "avgDistance": 161, "totalSwipes": 2},
        "swipeHistory": [
            {"x": 310, "y": 220, "distance": 161, "velocity": 537, "duration": 300,
             "timestamp": "10:42:01", "risk": 0.1, "mlPrediction": "ALLOW", "mlRiskScore": 0.0},
            {"x": 300, "y": 200, "distance": 500, "velocity": 2000, "duration": 250,
             "timestamp": "10:42:09", "risk": 1.0, "mlPrediction": "BLOCK", "mlRiskScore": 1.0}
        ],
        "exportDate": "2026-10-01T10:42:30.000Z",
        "totalSwipes": 2
    }"#;

    #[test]
    fn test_parse_capture_export() {
        let dataset = TrainingDataset::from_json(EXPORT).unwrap();
        assert_eq!(dataset.user_profile.avg_velocity, 537.0);
        assert_eq!(dataset.total_swipes, Some(2));
        assert!(dataset.export_date.is_some());

        let samples = dataset.samples().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1], GestureSample::new(2000.0, 500.0, 250.0));
    }

    #[test]
    fn test_missing_field_is_invalid_sample() {
        let json = r#"{
            "userProfile": {"avgVelocity": 0, "avgDistance": 0, "totalSwipes": 0},
            "swipeHistory": [
                {"distance": 161, "velocity": 537, "duration": 300},
                {"distance": 150, "velocity": 510}
            ]
        }"#;
        let dataset = TrainingDataset::from_json(json).unwrap();
        let err = dataset.samples().unwrap_err();
        assert!(matches!(err, Error::InvalidSample(_)));
        let msg = err.to_string();
        assert!(msg.contains("swipe #1"));
        assert!(msg.contains("duration"));
    }

    #[test]
    fn test_empty_history_is_insufficient() {
        let dataset = TrainingDataset::default();
        assert!(matches!(
            dataset.samples(),
            Err(Error::InsufficientData {
                required: 1,
                actual: 0
            })
        ));
    }

    #[test]
    fn test_from_samples_layout() {
        let samples = vec![
            GestureSample::new(500.0, 150.0, 400.0),
            GestureSample::new(520.0, 160.0, 420.0),
        ];
        let dataset = TrainingDataset::from_samples(&samples);
        let json = dataset.to_json_pretty().unwrap();
        assert!(json.contains("swipeHistory"));
        assert!(json.contains("avgVelocity"));

        let parsed = TrainingDataset::from_json(&json).unwrap();
        assert_eq!(parsed.samples().unwrap(), samples);
        assert_eq!(parsed.user_profile.avg_velocity, 510.0);
    }
}

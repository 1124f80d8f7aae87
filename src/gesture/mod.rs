//! Gesture Data
//!
//! スワイプジェスチャーの入力データ型。
//!
//! - [`GestureSample`]: 1回のスワイプ計測値
//! - [`UserProfile`]: 学習データに付随するユーザー概要
//! - [`FeatureVector`]: モデル入力用の固定長特徴量
//! - [`TrainingDataset`]: キャプチャアプリがエクスポートした学習データ

pub mod dataset;
pub mod features;
pub mod synthetic;

use serde::{Deserialize, Serialize};

pub use dataset::{SwipeRecord, TrainingDataset};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};

/// スワイプ1回分の計測値
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    /// 速度（px/s）
    pub velocity: f64,
    /// 移動距離（px）
    pub distance: f64,
    /// 継続時間（ms）
    pub duration: f64,
}

impl GestureSample {
    /// 新しいサンプルを作成
    pub fn new(velocity: f64, distance: f64, duration: f64) -> Self {
        Self {
            velocity,
            distance,
            duration,
        }
    }

    /// Per-feature arithmetic mean of a sample set, `None` when empty.
    pub fn centroid(samples: &[GestureSample]) -> Option<GestureSample> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let (v, d, t) = samples.iter().fold((0.0, 0.0, 0.0), |(v, d, t), s| {
            (v + s.velocity, d + s.distance, t + s.duration)
        });
        Some(GestureSample::new(v / n, d / n, t / n))
    }
}

/// ユーザープロファイル（集計値）
///
/// Supplied alongside the training sample. The engine never fits it; it only
/// seeds scenario gestures and reports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// 平均速度（px/s）
    pub avg_velocity: f64,
    /// 平均距離（px）
    pub avg_distance: f64,
    /// 総スワイプ数
    pub total_swipes: usize,
}

impl UserProfile {
    /// サンプルからプロファイルを集計
    ///
    /// Averages are rounded to whole pixels, matching what the capture app
    /// writes into its exports.
    pub fn from_samples(samples: &[GestureSample]) -> Self {
        match GestureSample::centroid(samples) {
            Some(mean) => Self {
                avg_velocity: mean.velocity.round(),
                avg_distance: mean.distance.round(),
                total_swipes: samples.len(),
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid() {
        let samples = vec![
            GestureSample::new(400.0, 100.0, 300.0),
            GestureSample::new(600.0, 200.0, 500.0),
        ];
        let mean = GestureSample::centroid(&samples).unwrap();
        assert_eq!(mean, GestureSample::new(500.0, 150.0, 400.0));
        assert!(GestureSample::centroid(&[]).is_none());
    }

    #[test]
    fn test_profile_from_samples_rounds_averages() {
        let samples = vec![
            GestureSample::new(500.0, 150.0, 400.0),
            GestureSample::new(501.0, 151.0, 420.0),
        ];
        let profile = UserProfile::from_samples(&samples);
        // 500.5 rounds away from zero
        assert_eq!(profile.avg_velocity, 501.0);
        assert_eq!(profile.avg_distance, 151.0);
        assert_eq!(profile.total_swipes, 2);
    }

    #[test]
    fn test_profile_camel_case() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"avgVelocity": 537, "avgDistance": 161, "totalSwipes": 42}"#,
        )
        .unwrap();
        assert_eq!(profile.avg_velocity, 537.0);
        assert_eq!(profile.total_swipes, 42);
    }
}

//! Test Data
//!
//! テスト用の共通データとヘルパー関数

#![allow(dead_code)]

use swipe_auth::gesture::synthetic::GestureDistribution;
use swipe_auth::GestureSample;

/// 合成データのシード
pub const SEED: u64 = 20240901;

/// 通常ユーザーの合成スワイプ（N(500,50), N(150,20), N(500,50)）
pub fn user_swipes(count: usize) -> Vec<GestureSample> {
    GestureDistribution::default()
        .generate(count, SEED)
        .expect("default distribution is valid")
}

/// 学習サンプルの平均ジェスチャー
pub fn mean_swipe(samples: &[GestureSample]) -> GestureSample {
    GestureSample::centroid(samples).expect("non-empty sample")
}

/// キャプチャアプリのエクスポート形式（表示用フィールド付き）
pub fn capture_export_json() -> &'static str {
    r#"{
  "userProfile": {"avgVelocity": 503, "avgDistance": 149, "totalSwipes": 12},
  "swipeHistory": [
    {"x": 301, "y": 212, "distance": 148, "velocity": 497, "duration": 298, "timestamp": "10:42:01", "risk": 0.01, "mlPrediction": "ALLOW"},
    {"x": 188, "y": 402, "distance": 161, "velocity": 530, "duration": 304, "timestamp": "10:42:03", "risk": 0.05, "mlPrediction": "ALLOW"},
    {"x": 255, "y": 330, "distance": 137, "velocity": 468, "duration": 293, "timestamp": "10:42:05", "risk": 0.07, "mlPrediction": "ALLOW"},
    {"x": 240, "y": 310, "distance": 155, "velocity": 512, "duration": 303, "timestamp": "10:42:06", "risk": 0.02, "mlPrediction": "ALLOW"},
    {"x": 199, "y": 377, "distance": 142, "velocity": 489, "duration": 290, "timestamp": "10:42:08", "risk": 0.03, "mlPrediction": "ALLOW"},
    {"x": 322, "y": 251, "distance": 158, "velocity": 521, "duration": 303, "timestamp": "10:42:10", "risk": 0.04, "mlPrediction": "ALLOW"},
    {"x": 276, "y": 289, "distance": 144, "velocity": 476, "duration": 303, "timestamp": "10:42:12", "risk": 0.05, "mlPrediction": "ALLOW"},
    {"x": 231, "y": 356, "distance": 153, "velocity": 509, "duration": 301, "timestamp": "10:42:13", "risk": 0.01, "mlPrediction": "ALLOW"},
    {"x": 210, "y": 300, "distance": 139, "velocity": 482, "duration": 288, "timestamp": "10:42:15", "risk": 0.04, "mlPrediction": "ALLOW"},
    {"x": 290, "y": 275, "distance": 163, "velocity": 544, "duration": 300, "timestamp": "10:42:17", "risk": 0.08, "mlPrediction": "ALLOW"},
    {"x": 262, "y": 318, "distance": 150, "velocity": 500, "duration": 300, "timestamp": "10:42:19", "risk": 0.0, "mlPrediction": "ALLOW"},
    {"x": 218, "y": 341, "distance": 146, "velocity": 508, "duration": 287, "timestamp": "10:42:21", "risk": 0.01, "mlPrediction": "ALLOW"}
  ],
  "exportDate": "2026-10-01T10:42:30.000Z",
  "totalSwipes": 12
}"#
}

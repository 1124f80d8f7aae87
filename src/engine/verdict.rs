//! Verdict Types
//!
//! 判定結果の型定義

use crate::model::{range::RangeCheck, ModelKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 判定ラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictLabel {
    /// 本人の操作と一致
    Allow,
    /// 異常（なりすまし・ボットの可能性）
    Block,
}

impl VerdictLabel {
    pub fn from_inside(inside: bool) -> Self {
        if inside {
            VerdictLabel::Allow
        } else {
            VerdictLabel::Block
        }
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictLabel::Allow => f.write_str("ALLOW"),
            VerdictLabel::Block => f.write_str("BLOCK"),
        }
    }
}

/// 判定の補足情報
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// 使用したモデル
    pub model_kind: ModelKind,
    /// 境界からの符号付き距離（ノベルティモデルのみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    /// 特徴量ごとの範囲チェック（レンジモデルのみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_check: Option<RangeCheck>,
    /// 速度の相対乖離（0.0-1.0）。ラベルには影響しない
    pub risk_score: f64,
}

/// 判定結果
///
/// Produced per decision call and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// ALLOW / BLOCK
    pub label: VerdictLabel,
    /// 信頼度（0以上）。レンジモデルでは常に 0.0
    pub confidence: f64,
    pub diagnostics: Diagnostics,
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        self.label == VerdictLabel::Allow
    }
}

/// Relative velocity deviation from the user's mean, capped at 1.
///
/// Zero when the mean is not positive.
pub fn risk_score(velocity: f64, mean_velocity: f64) -> f64 {
    if mean_velocity > 0.0 {
        ((velocity - mean_velocity).abs() / mean_velocity).min(1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_wire_format() {
        assert_eq!(
            serde_json::to_string(&VerdictLabel::Allow).unwrap(),
            "\"ALLOW\""
        );
        assert_eq!(VerdictLabel::Block.to_string(), "BLOCK");
        assert_eq!(VerdictLabel::from_inside(false), VerdictLabel::Block);
    }

    #[test]
    fn test_risk_score() {
        assert_eq!(risk_score(537.0, 537.0), 0.0);
        assert!((risk_score(644.4, 537.0) - 0.2).abs() < 1e-9);
        assert_eq!(risk_score(2000.0, 537.0), 1.0);
        assert_eq!(risk_score(100.0, 0.0), 0.0);
    }
}

//! Scenario Probes
//!
//! ユーザープロファイルから人が読める検証シナリオを作り、学習済みモデルで判定します。

use super::{DecisionEngine, Verdict};
use crate::error::Result;
use crate::gesture::{GestureSample, UserProfile};
use serde::{Deserialize, Serialize};

/// 検証シナリオ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub sample: GestureSample,
}

impl Scenario {
    pub fn new(name: impl Into<String>, velocity: f64, distance: f64, duration: f64) -> Self {
        Self {
            name: name.into(),
            sample: GestureSample::new(velocity, distance, duration),
        }
    }
}

/// シナリオの判定結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub verdict: Verdict,
}

/// プロファイルを基準にした標準シナリオ
///
/// Typical, slightly faster, bot-fast, very slow, and an unrelated user.
pub fn profile_scenarios(profile: &UserProfile) -> Vec<Scenario> {
    let v = profile.avg_velocity;
    let d = profile.avg_distance;
    vec![
        Scenario::new("Typical swipe", v, d, 500.0),
        Scenario::new("Slightly faster swipe", v * 1.2, d * 1.1, 450.0),
        Scenario::new("Very fast swipe (bot/attacker)", v * 3.0, 600.0, 200.0),
        Scenario::new("Very slow swipe (elderly/injured)", v * 0.1, 50.0, 2000.0),
        Scenario::new("Random user swipe", 800.0, 400.0, 500.0),
    ]
}

impl DecisionEngine {
    /// シナリオを順に判定
    pub fn run_scenarios(&self, scenarios: &[Scenario]) -> Result<Vec<ScenarioOutcome>> {
        scenarios
            .iter()
            .map(|scenario| {
                Ok(ScenarioOutcome {
                    verdict: self.decide_sample(&scenario.sample)?,
                    scenario: scenario.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::{train, VerdictLabel};
    use crate::gesture::synthetic::GestureDistribution;
    use crate::model::ModelKind;

    #[test]
    fn test_profile_scenarios_scale_with_profile() {
        let profile = UserProfile {
            avg_velocity: 500.0,
            avg_distance: 150.0,
            total_swipes: 50,
        };
        let scenarios = profile_scenarios(&profile);
        assert_eq!(scenarios.len(), 5);
        assert_eq!(scenarios[0].sample, GestureSample::new(500.0, 150.0, 500.0));
        assert_eq!(scenarios[2].sample.velocity, 1500.0);
        assert_eq!(scenarios[3].sample.duration, 2000.0);
    }

    #[test]
    fn test_run_scenarios() {
        let samples = GestureDistribution::default().generate(60, 5).unwrap();
        let profile = UserProfile::from_samples(&samples);
        let training = train(&samples, ModelKind::Range, &EngineConfig::default()).unwrap();

        let outcomes = training
            .engine
            .run_scenarios(&profile_scenarios(&profile))
            .unwrap();
        assert_eq!(outcomes.len(), 5);
        assert_eq!(outcomes[0].verdict.label, VerdictLabel::Allow);
        assert_eq!(outcomes[2].verdict.label, VerdictLabel::Block);
        assert_eq!(outcomes[3].verdict.label, VerdictLabel::Block);
    }
}

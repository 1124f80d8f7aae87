//! # swipe-auth
//!
//! Continuous authentication from swipe gestures.
//!
//! A user's own swipes (velocity, distance, duration) train one of two models:
//! a transparent statistical range model or a one-class RBF novelty model.
//! The resulting [`DecisionEngine`] answers ALLOW or BLOCK, with a confidence,
//! for every later swipe.

pub mod config;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod logging;
pub mod model;
pub mod normalize;

pub use config::{EngineConfig, KernelBandwidth, LoggingConfig, NoveltyConfig, RangeConfig};
pub use engine::{
    profile_scenarios, train, DecisionEngine, Diagnostics, Scenario, ScenarioOutcome, Training,
    TrainingReport, Verdict, VerdictLabel,
};
pub use error::{Error, Result};
pub use gesture::{FeatureVector, GestureSample, TrainingDataset, UserProfile};
pub use model::{GestureModel, Model, ModelArtifact, ModelKind};
pub use normalize::NormalizationParameters;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::InvalidSample("velocity is NaN".to_string());
        assert!(err.to_string().contains("velocity is NaN"));
    }
}

//! Command handlers
//!
//! ライブラリの構造化された結果を人が読める形式で出力します。

use super::locate::resolve_dataset;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use swipe_auth::gesture::synthetic::GestureDistribution;
use swipe_auth::{
    engine, profile_scenarios, DecisionEngine, EngineConfig, ModelArtifact, ModelKind,
    ScenarioOutcome, TrainingDataset, TrainingReport, UserProfile, Verdict,
};
use tracing::{info, warn};

/// `train`
pub fn train(config: &EngineConfig, data: &Path, kind: ModelKind, out: Option<PathBuf>) -> Result<()> {
    let dataset_path = resolve_dataset(data)?;
    info!("Loading dataset {}", dataset_path.display());

    let dataset = TrainingDataset::read_from(&dataset_path)
        .with_context(|| format!("cannot load dataset {}", dataset_path.display()))?;
    let samples = dataset.samples()?;
    let profile = UserProfile::from_samples(&samples);

    println!("📂 Dataset: {}", dataset_path.display());
    print_profile(&profile);
    if samples.len() < config.range.recommended_samples {
        println!(
            "⚠️  Only {} swipes; {} or more recommended",
            samples.len(),
            config.range.recommended_samples
        );
    }

    let training = engine::train(&samples, kind, config)?;
    print_report(&training.report);

    let outcomes = training.engine.run_scenarios(&profile_scenarios(&profile))?;
    print_scenarios(&outcomes);

    let out = out.unwrap_or_else(|| default_model_path(kind));
    training
        .engine
        .to_artifact()
        .write_to(&out)
        .with_context(|| format!("cannot write model to {}", out.display()))?;
    println!("💾 Model saved: {}", out.display());
    Ok(())
}

/// `decide`
pub fn decide(
    config: &EngineConfig,
    model: &Path,
    velocity: f64,
    distance: f64,
    duration: f64,
    json: bool,
) -> Result<()> {
    let artifact = ModelArtifact::read_from(model)
        .with_context(|| format!("cannot load model {}", model.display()))?;
    info!(
        "Loaded {} model trained at {}",
        artifact.kind(),
        artifact.trained_at
    );

    let engine = DecisionEngine::from_artifact(artifact, config.clone())?;
    let verdict = engine.decide(velocity, distance, duration)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("{}", format_verdict(&verdict));
    }
    Ok(())
}

/// `simulate`
pub fn simulate(count: usize, seed: u64, out: Option<PathBuf>) -> Result<()> {
    if count == 0 {
        bail!("--count must be at least 1");
    }
    let samples = GestureDistribution::default().generate(count, seed)?;
    let dataset = TrainingDataset::from_samples(&samples);

    let out = out.unwrap_or_else(|| {
        PathBuf::from(format!(
            "swipeauth_data_{}.json",
            Utc::now().timestamp_millis()
        ))
    });
    std::fs::write(&out, dataset.to_json_pretty()?)
        .with_context(|| format!("cannot write dataset to {}", out.display()))?;

    println!("🎲 Generated {} synthetic swipes (seed {})", count, seed);
    print_profile(&dataset.user_profile);
    println!("💾 Dataset saved: {}", out.display());
    Ok(())
}

/// `config init`
pub fn config_init(out: &Path, force: bool) -> Result<()> {
    if out.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", out.display());
    }
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, EngineConfig::sample_toml()?)?;
    println!("📝 Sample configuration written: {}", out.display());
    Ok(())
}

pub fn default_model_path(kind: ModelKind) -> PathBuf {
    PathBuf::from(format!("swipeauth_{}_model.json", kind))
}

fn print_profile(profile: &UserProfile) {
    println!("👤 User profile");
    println!("   Avg velocity: {} px/s", profile.avg_velocity);
    println!("   Avg distance: {} px", profile.avg_distance);
    println!("   Total swipes: {}", profile.total_swipes);
}

fn print_report(report: &TrainingReport) {
    println!("🧠 {} model on {} training swipes", report.model_kind, report.sample_count);
    println!(
        "   ALLOW: {} ({:.1}%)",
        report.allowed,
        report.allow_rate() * 100.0
    );
    println!("   BLOCK: {}", report.blocked);
    if report.allowed == 0 {
        warn!("Model rejects every training swipe");
    }
}

fn print_scenarios(outcomes: &[ScenarioOutcome]) {
    println!("🧪 Scenarios");
    for outcome in outcomes {
        let sample = &outcome.scenario.sample;
        println!(
            "   {:<36} v={:>7.1} d={:>6.1} t={:>6.1} → {}",
            outcome.scenario.name,
            sample.velocity,
            sample.distance,
            sample.duration,
            format_verdict(&outcome.verdict)
        );
    }
}

pub fn format_verdict(verdict: &Verdict) -> String {
    let mut line = format!(
        "{} (confidence {:.3}, risk {:.2})",
        verdict.label, verdict.confidence, verdict.diagnostics.risk_score
    );
    if let Some(margin) = verdict.diagnostics.margin {
        line.push_str(&format!(", margin {:+.4}", margin));
    }
    if let Some(check) = verdict.diagnostics.range_check {
        line.push_str(&format!(
            ", velocity {} distance {}",
            if check.velocity_within { "in" } else { "out" },
            if check.distance_within { "in" } else { "out" }
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipe_auth::{Diagnostics, VerdictLabel};
    use tempfile::tempdir;

    #[test]
    fn test_default_model_path() {
        assert_eq!(
            default_model_path(ModelKind::Novelty),
            PathBuf::from("swipeauth_novelty_model.json")
        );
    }

    #[test]
    fn test_format_verdict() {
        let verdict = Verdict {
            label: VerdictLabel::Block,
            confidence: 0.25,
            diagnostics: Diagnostics {
                model_kind: ModelKind::Novelty,
                margin: Some(-0.25),
                range_check: None,
                risk_score: 1.0,
            },
        };
        let line = format_verdict(&verdict);
        assert!(line.starts_with("BLOCK"));
        assert!(line.contains("margin -0.2500"));
    }

    #[test]
    fn test_simulate_then_train() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("swipeauth_data_1760000000000.json");
        let model = dir.path().join("model.json");

        simulate(40, 9, Some(data)).unwrap();
        train(
            &EngineConfig::default(),
            dir.path(),
            ModelKind::Range,
            Some(model.clone()),
        )
        .unwrap();

        let artifact = ModelArtifact::read_from(&model).unwrap();
        assert_eq!(artifact.kind(), ModelKind::Range);
    }

    #[test]
    fn test_config_init_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("swipe-auth.toml");
        config_init(&out, false).unwrap();
        assert!(config_init(&out, false).is_err());
        assert!(config_init(&out, true).is_ok());
    }
}

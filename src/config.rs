//! Engine configuration.
//!
//! デフォルト値 → 設定ファイル（TOML）→ 環境変数（`SWIPE_AUTH__*`）の順に上書きします。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Files probed when no explicit path is given, first match wins.
const CONFIG_PATHS: [&str; 2] = ["swipe-auth.toml", "config/swipe-auth.toml"];

/// Environment variable prefix, e.g. `SWIPE_AUTH__NOVELTY__NU=0.25`
pub const ENV_PREFIX: &str = "SWIPE_AUTH";

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub range: RangeConfig,
    pub novelty: NoveltyConfig,
    pub logging: LoggingConfig,
}

/// 統計レンジモデルの設定
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RangeConfig {
    /// 許容幅（標準偏差の倍数 k）。判定時に適用する
    pub width: f64,
    /// これ未満のサンプル数では警告を出す
    pub recommended_samples: usize,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            width: 2.0,
            recommended_samples: 30,
        }
    }
}

/// RBFカーネルのバンド幅（gamma）の決め方
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelBandwidth {
    /// `1 / (n_features * Var(X))` over the normalized training matrix
    #[default]
    Scale,
    /// `1 / n_features`
    Auto,
    /// 固定値
    Fixed(f64),
}

/// ノベルティ検知（One-Class SVM）モデルの設定
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NoveltyConfig {
    /// 想定外れ値比率 ν（0 < ν ≤ 1）
    pub nu: f64,
    /// カーネルバンド幅
    pub kernel_bandwidth: KernelBandwidth,
    /// 学習に必要な最小サンプル数
    pub min_samples: usize,
    /// SMO の停止許容誤差
    pub tolerance: f64,
    /// SMO の最大反復回数
    pub max_iterations: usize,
}

impl Default for NoveltyConfig {
    fn default() -> Self {
        Self {
            nu: 0.3,
            kernel_bandwidth: KernelBandwidth::Scale,
            min_samples: 10,
            tolerance: 1e-3,
            max_iterations: 100_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// ログレベル (trace, debug, info, warn, error) または EnvFilter 構文
    pub level: String,
    /// JSON形式で出力
    pub json: bool,
    /// 指定時は日次ローテーションのファイルにも出力
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            log_dir: None,
        }
    }
}

impl EngineConfig {
    /// 設定ファイルから読み込み、環境変数で上書き
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(found) = CONFIG_PATHS.iter().map(Path::new).find(|p| p.exists()) {
                    info!("Loading configuration from {}", found.display());
                    settings = settings.add_source(config::File::from(found));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 値の妥当性チェック
    pub fn validate(&self) -> Result<()> {
        self.range.validate()?;
        self.novelty.validate()
    }

    /// サンプル設定ファイルの内容を生成
    pub fn sample_toml() -> Result<String> {
        let body = toml::to_string_pretty(&Self::default())
            .map_err(|e| Error::Config(format!("cannot render sample config: {}", e)))?;

        Ok(format!(
            r#"# swipe-auth configuration
#
# Save as swipe-auth.toml. Every key can be overridden from the environment,
# e.g. SWIPE_AUTH__NOVELTY__NU=0.25 or SWIPE_AUTH__RANGE__WIDTH=2.5
#
# [range]
# width               = accepted band is mean ± width·std (velocity, distance)
# recommended_samples = warn when training on fewer swipes
#
# [novelty]
# nu                  = expected outlier fraction of the user's own swipes
# kernel_bandwidth    = "scale" | "auto" | {{ fixed = 0.5 }}
# min_samples         = refuse to fit below this many swipes
#
# [logging]
# log_dir             = also write daily-rotated log files here

{}"#,
            body
        ))
    }
}

impl RangeConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::Config(format!(
                "range.width must be positive, got {}",
                self.width
            )));
        }
        Ok(())
    }
}

impl NoveltyConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.nu > 0.0 && self.nu <= 1.0) {
            return Err(Error::Config(format!(
                "novelty.nu must be in (0, 1], got {}",
                self.nu
            )));
        }
        if let KernelBandwidth::Fixed(gamma) = self.kernel_bandwidth {
            if !(gamma.is_finite() && gamma > 0.0) {
                return Err(Error::Config(format!(
                    "novelty.kernel_bandwidth must be positive, got {}",
                    gamma
                )));
            }
        }
        if self.min_samples == 0 {
            return Err(Error::Config("novelty.min_samples must be at least 1".into()));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::Config(format!(
                "novelty.tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::Config(
                "novelty.max_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

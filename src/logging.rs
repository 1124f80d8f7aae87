//! Logging
//!
//! tracing-subscriber によるログ初期化。コンソール出力は常に stderr へ書き出し、
//! stdout は判定結果やレポート用に空けておきます。

use crate::config::LoggingConfig;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// ログファイル名（日次ローテーションで日付サフィックスが付く）
pub const LOG_FILE_NAME: &str = "swipe-auth.log";

/// ログ設定
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// ログレベル (trace, debug, info, warn, error)
    pub level: String,
    /// JSON形式で出力
    pub json: bool,
    /// ファイル出力先（None ならコンソールのみ）
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_logging_config(&LoggingConfig::default())
    }
}

impl LogConfig {
    /// エンジン設定からログ設定を作成
    pub fn from_logging_config(logging: &LoggingConfig) -> Self {
        Self {
            level: logging.level.clone(),
            json: logging.json,
            log_dir: logging.log_dir.clone(),
        }
    }

    /// ログレベルを上書き
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// JSON出力を設定
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// カスタムログディレクトリを設定
    pub fn with_log_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// 不正なレベル指定は info にフォールバック
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// ログシステムを初期化
///
/// ファイル出力時は `WorkerGuard` を返すので、プロセス終了まで保持すること。
/// Guard を落とすとバッファ済みのログが書き出されない。
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = config.env_filter();

    let guard = match &config.log_dir {
        Some(dir) => {
            ensure_log_dir(dir)?;
            let (file_writer, guard) = non_blocking(rolling::daily(dir, LOG_FILE_NAME));
            let writer = std::io::stderr.and(file_writer);
            let builder = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_target(true);
            let installed = if config.json {
                builder.json().try_init()
            } else {
                builder.try_init()
            };
            installed.map_err(|e| anyhow::anyhow!("failed to install subscriber: {}", e))?;
            Some(guard)
        }
        None => {
            let builder = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false);
            let installed = if config.json {
                builder.json().try_init()
            } else {
                builder.try_init()
            };
            installed.map_err(|e| anyhow::anyhow!("failed to install subscriber: {}", e))?;
            None
        }
    };

    tracing::debug!("ログレベル: {}", config.level);
    if let Some(dir) = &config.log_dir {
        tracing::debug!("ログディレクトリ: {}", dir.display());
    }

    Ok(guard)
}

/// ログディレクトリを確保
fn ensure_log_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_log_config_from_logging_config() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            json: true,
            log_dir: Some(PathBuf::from("/var/log/swipe-auth")),
        };

        let config = LogConfig::from_logging_config(&logging);
        assert_eq!(config.level, "debug");
        assert!(config.json);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/swipe-auth")));
    }

    #[test]
    fn test_builder_overrides() {
        let config = LogConfig::default()
            .with_level("warn")
            .with_json(true)
            .with_log_dir("logs");
        assert_eq!(config.level, "warn");
        assert!(config.json);
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let config = LogConfig::default().with_level("swipe_auth=verbose");
        assert_eq!(config.env_filter().to_string(), "info");
    }

    #[test]
    fn test_ensure_log_dir() {
        let temp_dir = tempdir().unwrap();
        let log_dir = temp_dir.path().join("test_logs");

        assert!(ensure_log_dir(&log_dir).is_ok());
        assert!(log_dir.exists());
    }
}

//! Command-Line Interface

pub mod commands;
pub mod locate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swipe_auth::ModelKind;

/// swipe-auth - continuous authentication from swipe gestures
#[derive(Parser, Debug)]
#[command(name = "swipe-auth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (default: swipe-auth.toml or config/swipe-auth.toml if present)
    #[arg(short, long, global = true, env = "SWIPE_AUTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level or filter directive, overrides the config file
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a model from an exported swipe dataset
    Train {
        /// Dataset file, or a directory holding swipeauth_data_*.json exports
        #[arg(short, long, default_value = ".")]
        data: PathBuf,

        /// Model variant
        #[arg(short, long, default_value = "novelty", value_parser = parse_model_kind)]
        model: ModelKind,

        /// Artifact path (default: swipeauth_<kind>_model.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Decide ALLOW or BLOCK for one swipe
    Decide {
        /// Model artifact written by `train`
        #[arg(short, long)]
        model: PathBuf,

        /// Swipe velocity (px/s)
        #[arg(long, allow_negative_numbers = true)]
        velocity: f64,

        /// Swipe distance (px)
        #[arg(long, allow_negative_numbers = true)]
        distance: f64,

        /// Swipe duration (ms)
        #[arg(long, allow_negative_numbers = true)]
        duration: f64,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a synthetic dataset in the capture-app export format
    Simulate {
        /// Number of swipes
        #[arg(short = 'n', long, default_value = "50")]
        count: usize,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output file (default: swipeauth_data_<unix millis>.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a commented sample configuration file
    Init {
        /// Output file
        #[arg(short, long, default_value = "swipe-auth.toml")]
        out: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_model_kind(s: &str) -> Result<ModelKind, String> {
    s.parse::<ModelKind>().map_err(|e| e.to_string())
}

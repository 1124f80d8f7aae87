//! swipe-auth Binary Entry Point

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{commands, Cli, Commands, ConfigAction};
use swipe_auth::logging::{init_logging, LogConfig};
use swipe_auth::EngineConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // config init must work even when the existing config is broken
    if let Commands::Config {
        action: ConfigAction::Init { out, force },
    } = &cli.command
    {
        return commands::config_init(out, *force);
    }

    let config = EngineConfig::load(cli.config.as_deref())?;

    let mut log_config = LogConfig::from_logging_config(&config.logging);
    if let Some(level) = &cli.log_level {
        log_config = log_config.with_level(level.clone());
    }
    if cli.json_logs {
        log_config = log_config.with_json(true);
    }
    let _guard = init_logging(&log_config)?;

    match cli.command {
        Commands::Train { data, model, out } => commands::train(&config, &data, model, out),
        Commands::Decide {
            model,
            velocity,
            distance,
            duration,
            json,
        } => commands::decide(&config, &model, velocity, distance, duration, json),
        Commands::Simulate { count, seed, out } => commands::simulate(count, seed, out),
        Commands::Config { .. } => Ok(()),
    }
}

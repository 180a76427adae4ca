//! gpk-select - Main entry point
//!
//! Headless driver for the package selection core.

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gpk_select::cli::{Cli, Commands};
use gpk_select::config::SessionConfig;
use gpk_select::package_id::PackageId;
use gpk_select::replay;

/// Initialize logging; `RUST_LOG` overrides both the flag and the config
fn init_logger(verbose: bool, configured: Option<&str>) {
    let fallback = match (verbose, configured) {
        (true, _) => "debug",
        (false, Some(filter)) => filter,
        (false, None) => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Replay {
            script,
            config,
            json,
            strict,
        } => {
            let config = match config {
                Some(path) => SessionConfig::load_from_file(&path)?,
                None => SessionConfig::default(),
            };
            init_logger(cli.verbose, config.log_filter.as_deref());
            info!("replaying {:?}", script);

            let steps = replay::load_script(&script)
                .with_context(|| format!("Failed to load replay script {:?}", script))?;
            debug!("{} step(s) loaded", steps.len());
            let report = if strict {
                replay::run_strict(&steps, config)
                    .with_context(|| format!("Replay of {:?} stopped", script))?
            } else {
                replay::run(&steps, config)
            };

            if json {
                let out = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize replay report")?;
                println!("{}", out);
            } else {
                print!("{}", report);
            }
        }
        Commands::ParseId { id } => {
            init_logger(cli.verbose, None);
            let id: PackageId = id.parse()?;
            println!("name:    {}", id.name());
            println!("version: {}", id.version());
            println!("arch:    {}", id.arch());
            println!("data:    {}", id.data());
        }
        Commands::Config { init, check } => {
            init_logger(cli.verbose, None);
            if let Some(path) = init {
                SessionConfig::default().save_to_file(&path)?;
                println!("Wrote default configuration to {:?}", path);
            } else if let Some(path) = check {
                SessionConfig::load_from_file(&path)?;
                println!("Configuration file is valid: {:?}", path);
            } else {
                let out = serde_json::to_string_pretty(&SessionConfig::default())
                    .context("Failed to serialize default configuration")?;
                println!("{}", out);
            }
        }
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gpk-select - package selection state for graphical package managers
#[derive(Parser)]
#[command(name = "gpk-select")]
#[command(about = "Replay and inspect package install/remove selection sessions")]
#[command(version)]
pub struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scripted session and print the resulting rows and batch
    Replay {
        /// Path to the JSON replay script
        script: PathBuf,

        /// Session configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the final report as JSON
        #[arg(long)]
        json: bool,

        /// Stop with an error at the first step that cannot be recovered from
        #[arg(long)]
        strict: bool,
    },
    /// Validate and print a package id (name;version;arch;data)
    ParseId {
        /// Package id to parse
        id: String,
    },
    /// Work with session configuration files
    Config {
        /// Write the default configuration to this file
        #[arg(long, value_name = "FILE")]
        init: Option<PathBuf>,

        /// Validate this configuration file
        #[arg(long, value_name = "FILE", conflicts_with = "init")]
        check: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! benchpull CLI
//!
//! Fetches, verifies and runs the Geekbench CPU benchmark.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

/// benchpull - Fetch, verify and run the Geekbench benchmark
#[derive(Parser)]
#[command(name = "benchpull")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional configuration file overriding the compiled-in defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Defaults to `run`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download, verify, extract and run the benchmark
    Run,

    /// Show the archive and checksum this host would use
    Resolve {
        /// Machine string to resolve instead of the host's (e.g. aarch64)
        #[arg(long)]
        arch: Option<String>,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Dispatch to command handlers
    let config = cli.config.as_deref();
    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::execute(config).await,
        Commands::Resolve { arch } => commands::resolve::execute(config, arch.as_deref()),
        Commands::Validate { file } => commands::validate::execute(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            console::fatal(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

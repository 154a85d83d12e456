// src/main.rs

use anyhow::Result;
use clap::Parser;
use ecguess::cli::Cli;
use ecguess::config::ConfigBuilder;
use ecguess::run;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --- Configuration ---
    let config = match ConfigBuilder::from_cli(cli).build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    // RUST_LOG wins; otherwise info, or debug with --verbose.
    let default_level = if config.verbose { "ecguess=debug" } else { "ecguess=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    log::debug!("Starting ecguess v{}...", env!("CARGO_PKG_VERSION"));
    log::debug!("Raw arguments: {:?}", std::env::args().collect::<Vec<_>>());
    log::debug!("Configuration: {:?}", config);

    // --- Execution & Error Handling ---
    // Analyzer errors were already logged by the pipeline.
    match run(&config) {
        Ok(reports) => {
            let files: usize = reports.iter().map(|(_, report)| report.files).sum();
            log::debug!("Analyzed {} files in {} directories", files, reports.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

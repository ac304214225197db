//! vpk-extract CLI Binary
//!
//! Command-line interface for incremental VPK extraction.

use clap::Parser;
use std::process;
use tracing::{error, info, warn};
use vpk_extract::cli::{map_error, Cli, RunContext};
use vpk_extract::config::AppConfig;
use vpk_extract::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    // Initialize logging early
    let logging_config = build_logging_config(&cli, config.logging.clone());
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("vpk-extract starting");

    let context = RunContext::with_config(config);
    let token = context.cancellation_token();
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        warn!("Interrupt handler not installed: {}", e);
    }

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Apply logging flags on top of the loaded configuration.
/// Precedence: CLI flags override config file and environment override defaults.
fn build_logging_config(cli: &Cli, mut config: LoggingConfig) -> LoggingConfig {
    if cli.quiet {
        config.level = "off".to_string();
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
        if cli.log_output.is_none() {
            config.output = "file".to_string();
        }
    }
    config
}

//! Fuel model uploader: publishes a directory of Gazebo models to a Fuel
//! server, one model at a time.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use gzfuel_core::config::UploaderConfig;
use gzfuel_core::config::logging::{LogFormat, LoggingConfig};

mod cli;
mod output;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match UploaderConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = cli.execute(config).await {
        output::print_error(&e.message);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        LogFormat::Pretty => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
        LogFormat::Compact => {
            fmt()
                .compact()
                .with_env_filter(filter)
                .with_target(false)
                .init();
        }
    }
}

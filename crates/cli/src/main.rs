// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! station - FIFO admission to a shared platform

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod mediator;
mod output;
mod railway;
mod scenario;
mod simulate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use output::OutputFormat;
use scenario::Scenario;
use station_core::AdmissionConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "station",
    version,
    about = "Station - trains take turns on a shared platform"
)]
struct Cli {
    /// Log filter used when STATION_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the railway walkthrough (passenger and freight train)
    Demo {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Print published events instead of the trace
        #[arg(long)]
        events: bool,
    },
    /// Run a TOML scenario file
    Run {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Print published events instead of the trace
        #[arg(long)]
        events: bool,
    },
    /// Print the mediator walkthrough
    Mediator {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Send concurrent trains through the async gate
    Simulate {
        /// Number of trains
        #[arg(long, default_value_t = 5)]
        trains: usize,
        /// How long each train stays on the platform
        #[arg(long, default_value_t = 10)]
        dwell_ms: u64,
        /// Station config file
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Commands::Demo { format, events } => {
            play(&Scenario::railway_demo(), format, events)?;
        }
        Commands::Run {
            file,
            format,
            events,
        } => {
            let scenario = Scenario::load(&file)?;
            play(&scenario, format, events)?;
        }
        Commands::Mediator { format } => {
            output::print_list(&mediator::client_trace(), format)?;
        }
        Commands::Simulate {
            trains,
            dwell_ms,
            config,
            format,
        } => {
            let config = match config {
                Some(path) => AdmissionConfig::load(&path)?,
                None => AdmissionConfig::default(),
            };
            let records =
                simulate::simulate(config, trains, Duration::from_millis(dwell_ms)).await?;
            output::print_list(&records, format)?;
        }
    }

    Ok(())
}

fn play(scenario: &Scenario, format: OutputFormat, events: bool) -> Result<()> {
    let station = scenario.run()?;
    tracing::debug!(snapshot = ?station.snapshot(), "scenario finished");
    if events {
        output::print_list(&station.drain_events(), format)?;
    } else {
        output::print_list(&station.trace(), format)?;
    }
    Ok(())
}

fn setup_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("STATION_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

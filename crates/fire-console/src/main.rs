//! Operator console for building fire alerts.
//!
//! `watch` (the default) shows pushed alerts one at a time as a banner on
//! stdout. The other subcommands query the sensor API's history endpoints.

mod commands;
mod config;
mod watch;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use sensor_history::{parse_time_bound, Location, SignalKind};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "fire-console")]
#[command(about = "Fire alert banner and sensor history console")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show fire alerts as they arrive (default)
    Watch,

    /// Print sensor readings as one series per building/floor
    History {
        /// Signal type: Temperature, Humidity or Acoustic
        #[arg(long = "type", default_value = "Temperature")]
        kind: SignalKind,

        /// Building/floor pair, e.g. A-1 (repeatable)
        #[arg(long = "location", short = 'l', required = true)]
        locations: Vec<Location>,

        /// Start of the window (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
        #[arg(long, value_parser = parse_time_bound)]
        start: Option<NaiveDateTime>,

        /// End of the window, exclusive
        #[arg(long, value_parser = parse_time_bound)]
        end: Option<NaiveDateTime>,

        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Readings per location
        #[arg(long, default_value_t = sensor_history::DEFAULT_SERIES_PAGE_SIZE)]
        page_size: u32,
    },

    /// Print min/max/mean statistics for a signal type
    Stats {
        /// Signal type: Temperature, Humidity or Acoustic
        kind: SignalKind,
    },

    /// Check whether a building/floor is on fire
    FireStatus {
        /// Building/floor pair, e.g. B-3
        location: Location,
    },

    /// List scheduled events that are in progress
    Events {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so the banner owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        match args.command.unwrap_or(Command::Watch) {
            Command::Watch => watch::run(&config).await,
            Command::History {
                kind,
                locations,
                start,
                end,
                page,
                page_size,
            } => commands::history(&config, kind, locations, start, end, page, page_size).await,
            Command::Stats { kind } => commands::stats(&config, kind).await,
            Command::FireStatus { location } => commands::fire_status(&config, location).await,
            Command::Events { page, page_size } => {
                commands::events(&config, page, page_size).await
            }
        }
    })
}

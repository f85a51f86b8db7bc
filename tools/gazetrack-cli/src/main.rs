//! GazeTrack CLI: camera checks, offline replay and configuration.
//!
//! Usage:
//!   gazetrack check [--probe N]           Check camera capabilities
//!   gazetrack replay <SAMPLES> [OPTIONS]  Run recorded detections through the tracker
//!   gazetrack config [--save]             Show or write the effective config

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gazetrack_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "gazetrack",
    about = "Smoothed gaze direction tracking from a webcam",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check camera and ffmpeg availability
    Check {
        /// Open the configured camera and time this many frame reads
        #[arg(long)]
        probe: Option<u32>,
    },

    /// Replay recorded detector output (JSONL) through the tracking loop
    Replay {
        /// Path to a raw-sample JSONL file
        samples: PathBuf,

        /// Run on the background tracker at the configured cadence
        #[arg(long)]
        realtime: bool,

        /// How often to read the direction in realtime mode (ms)
        #[arg(long, default_value = "50")]
        poll_ms: u64,

        /// Override the smoothing factor (0, 1]
        #[arg(long)]
        smoothing_factor: Option<f64>,
    },

    /// Print the effective configuration as JSON
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    gazetrack_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Check { probe } => commands::check::run(&config, probe),
        Commands::Replay {
            samples,
            realtime,
            poll_ms,
            smoothing_factor,
        } => commands::replay::run(config, samples, realtime, poll_ms, smoothing_factor).await,
        Commands::Config { save } => commands::config::run(&config, save),
    }
}

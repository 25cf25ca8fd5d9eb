// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use depth_sentinel::config::Config;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "depth-sentinel")]
#[command(about = "Proximity alert and distance query engine for depth sensors")]
#[command(version = depth_sentinel::constants::app_version())]
#[command(subcommand_required = false)]
struct Cli {
    /// Configuration file path (default: $XDG_CONFIG_HOME/depth-sentinel/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless monitoring session
    Run {
        /// Alert ladder preset (from 'presets')
        #[arg(short, long)]
        preset: Option<String>,

        /// Raw depth recording to replay instead of the synthetic source
        #[arg(long)]
        playback: Option<PathBuf>,

        /// Loop the recording when it ends
        #[arg(long)]
        looped: bool,

        /// Session duration in seconds (default: until Ctrl+C)
        #[arg(short, long)]
        duration: Option<u64>,

        /// CSV output path (default: distance_data.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the interactive terminal viewer
    Terminal,

    /// List the built-in alert ladder presets
    Presets,

    /// Capture a single classified frame as a PNG
    Snapshot {
        /// Alert ladder preset (from 'presets')
        #[arg(short, long)]
        preset: Option<String>,

        /// Raw depth recording to sample instead of the synthetic source
        #[arg(long)]
        playback: Option<PathBuf>,

        /// Output file path (default: zones_TIMESTAMP.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the default configuration to the given path
    InitConfig {
        /// Destination (default: the standard config path)
        path: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=depth_sentinel=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let args = Cli::parse();

    match args.command {
        Some(Commands::Run {
            preset,
            playback,
            looped,
            duration,
            output,
        }) => cli::run_monitor(args.config, preset, playback, looped, duration, output),
        Some(Commands::Terminal) | None => run_terminal(args.config),
        Some(Commands::Presets) => cli::list_presets(),
        Some(Commands::Snapshot {
            preset,
            playback,
            output,
        }) => cli::take_snapshot(args.config, preset, playback, output),
        Some(Commands::InitConfig { path }) => init_config(path),
    }
}

fn run_terminal(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path.or_else(Config::default_path) {
        Some(path) if path.exists() => Config::load(&path)?,
        _ => Config::default(),
    };
    depth_sentinel::terminal::run(&config)
}

fn init_config(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let path = path
        .or_else(Config::default_path)
        .ok_or("No config directory available")?;
    let config = Config::default();
    config.save(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for headless monitoring
//!
//! This module provides command-line functionality for:
//! - Running a monitoring session without the terminal UI
//! - Listing the built-in alert ladder presets
//! - Capturing a single classified snapshot to a PNG

use chrono::Local;
use depth_sentinel::backends::alerts::ConsoleAlertSink;
use depth_sentinel::backends::input::click_channel;
use depth_sentinel::backends::sensor::playback::PlaybackSession;
use depth_sentinel::backends::sensor::synthetic::SyntheticSession;
use depth_sentinel::backends::sensor::DepthSession;
use depth_sentinel::config::Config;
use depth_sentinel::constants::LadderPreset;
use depth_sentinel::engine::classifier::classify;
use depth_sentinel::engine::{Engine, run_session};
use depth_sentinel::render::save_snapshot;
use depth_sentinel::storage::DistanceLog;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Load the configuration, with an optional preset override
fn load_config(
    config_path: Option<PathBuf>,
    preset: Option<String>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match config_path.or_else(Config::default_path) {
        Some(path) if path.exists() => Config::load(&path)?,
        _ => Config::default(),
    };

    if let Some(name) = preset {
        let preset = LadderPreset::from_name(&name)
            .ok_or_else(|| format!("Unknown preset '{}' (see 'presets')", name))?;
        config.thresholds_m = preset.thresholds_m().to_vec();
        config.cooldowns_ms = preset.cooldowns_ms().to_vec();
    }

    Ok(config)
}

/// Run a headless monitoring session until Ctrl+C or the duration elapses
pub fn run_monitor(
    config_path: Option<PathBuf>,
    preset: Option<String>,
    playback: Option<PathBuf>,
    looped: bool,
    duration: Option<u64>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path, preset)?;
    if let Some(path) = output {
        config.output_csv = Some(path);
    }

    let mut session: Box<dyn DepthSession> = match playback {
        Some(path) => {
            info!(path = %path.display(), looped, "Opening depth recording");
            Box::new(PlaybackSession::open(&path, config.sensor, looped)?)
        }
        None => {
            info!("No recording given, using the synthetic depth source");
            Box::new(SyntheticSession::open(config.sensor))
        }
    };

    let (width, height) = session.resolution();
    let ladder = config.ladder()?;
    println!(
        "Monitoring {}x{} @ {} fps, outer limit {} m",
        width, height, config.sensor.frame_rate, ladder.outer_limit_m()
    );

    let mut engine = Engine::new(
        ladder,
        width,
        height,
        config.query_ttl(),
        config.query_policy,
    );
    let csv_path = config.csv_path();
    let mut log = DistanceLog::create(&csv_path)?;

    // Headless runs take no point queries; the channel stays empty
    let (_clicks_tx, mut clicks_rx) = click_channel(1);
    let mut alert_sink = ConsoleAlertSink;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = stop.clone();
    ctrlc::set_handler(move || {
        stop_handler.store(true, Ordering::SeqCst);
    })?;

    let max_ticks = duration.map(|secs| secs * config.sensor.frame_rate as u64);

    println!("Press Ctrl+C to stop.");
    let summary = run_session(
        session.as_mut(),
        &mut engine,
        &mut clicks_rx,
        &mut log,
        &mut alert_sink,
        &stop,
        max_ticks,
        |_| {},
    )?;

    println!();
    println!(
        "Processed {} frames ({} skipped), {} alerts fired.",
        summary.ticks, summary.skipped_ticks, summary.alerts
    );
    println!("Distance data saved to {}", csv_path.display());

    Ok(())
}

/// List the built-in alert ladder presets
pub fn list_presets() -> Result<(), Box<dyn std::error::Error>> {
    println!("Available presets:");
    println!();
    for preset in LadderPreset::ALL {
        println!("  {}", preset.display_name());
        let bands: Vec<String> = preset
            .thresholds_m()
            .iter()
            .zip(preset.cooldowns_ms())
            .map(|(t, c)| format!("<{}m/{}ms", t, c))
            .collect();
        println!("      Bands: {}", bands.join(", "));
        println!();
    }
    Ok(())
}

/// Capture one classified frame and save it as a PNG
pub fn take_snapshot(
    config_path: Option<PathBuf>,
    preset: Option<String>,
    playback: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path, preset)?;

    let mut session: Box<dyn DepthSession> = match playback {
        Some(path) => Box::new(PlaybackSession::open(&path, config.sensor, false)?),
        None => {
            let mut synthetic = SyntheticSession::open_unpaced(config.sensor);
            // Let the synthetic target move inside the ladder before sampling
            for _ in 0..config.sensor.frame_rate * 2 {
                synthetic.wait_next_frame()?;
            }
            Box::new(synthetic)
        }
    };

    let ladder = config.ladder()?;
    let frame = session.wait_next_frame()?;
    session.close()?;

    let result = classify(&frame, &ladder);
    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!("zones_{}.png", Local::now().format("%Y%m%d_%H%M%S")))
    });
    save_snapshot(&result, &path)?;

    if result.has_target() {
        println!("Closest target: {:.2} m", result.closest_m);
    } else {
        println!("No target in range.");
    }
    println!("Snapshot saved to {}", path.display());

    Ok(())
}

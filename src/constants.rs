// SPDX-License-Identifier: GPL-3.0-only

//! Engine-wide constants - Single source of truth
//!
//! Ladder presets, alert tones, and sensor defaults live here. These values
//! are used across the classification and alerting pipeline.

use serde::{Deserialize, Serialize};

/// Default sensor resolution
pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

/// Default sensor frame rate (Hz)
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// Invalid depth marker value (no return from the sensor)
pub const DEPTH_INVALID_MM: u16 = 0;

/// Millimeters per meter, for depth sample conversion
pub const MM_PER_M: f32 = 1000.0;

/// Default time-to-live for a pending point query (milliseconds)
pub const DEFAULT_QUERY_TTL_MS: u64 = 3_000;

/// Default distance log file name
pub const DEFAULT_CSV_FILE: &str = "distance_data.csv";

/// Header row of the distance log
pub const CSV_HEADER: &str = "X, Y, Distance (m)";

/// Alert tone per zone tier: (frequency Hz, duration ms), nearest first.
///
/// Zone 0 is the most urgent band and gets the highest, longest tone.
/// Ladders with more tiers than tones reuse the outermost tone.
pub const ALERT_TONES: [(u32, u64); 4] = [(3_000, 200), (2_200, 180), (1_600, 160), (1_000, 150)];

/// Look up the tone for a zone tier, clamping to the outermost entry
pub fn tone_for_zone(zone: usize) -> (u32, u64) {
    ALERT_TONES[zone.min(ALERT_TONES.len() - 1)]
}

/// Application version from the build-time git describe
pub fn app_version() -> &'static str {
    env!("GIT_VERSION")
}

/// Distance ladder presets
///
/// The thresholds define the zone bands in meters; the cooldowns define the
/// minimum re-alert interval per zone in milliseconds. Users can choose
/// between the default ladder and a faster-cycling one for close work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LadderPreset {
    /// Default ladder - balanced re-alert intervals
    #[default]
    Standard,
    /// Same bands with shorter mid-range cooldowns
    Rapid,
}

impl LadderPreset {
    /// Get all preset variants for listing
    pub const ALL: [LadderPreset; 2] = [LadderPreset::Standard, LadderPreset::Rapid];

    /// Get display name for the preset
    pub fn display_name(&self) -> &'static str {
        match self {
            LadderPreset::Standard => "Standard",
            LadderPreset::Rapid => "Rapid",
        }
    }

    /// Zone thresholds in meters, strictly ascending
    pub fn thresholds_m(&self) -> &'static [f32] {
        match self {
            LadderPreset::Standard => &[0.3, 0.5, 1.0, 2.0],
            LadderPreset::Rapid => &[0.3, 0.5, 1.0, 2.0],
        }
    }

    /// Per-zone minimum re-alert intervals in milliseconds
    pub fn cooldowns_ms(&self) -> &'static [u64] {
        match self {
            LadderPreset::Standard => &[100, 1_500, 2_500, 5_000],
            LadderPreset::Rapid => &[100, 500, 1_500, 5_000],
        }
    }

    /// Parse a preset from its (case-insensitive) display name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.display_name().eq_ignore_ascii_case(name))
    }
}

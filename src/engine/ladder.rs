// SPDX-License-Identifier: GPL-3.0-only

//! Ordered distance threshold ladder
//!
//! A ladder is a strictly ascending list of distance thresholds (meters)
//! with a parallel list of per-zone re-alert cooldowns. Zone `i` covers the
//! half-open interval `[t[i-1], t[i])` with an implicit `t[-1] = 0`; any
//! distance at or beyond the outermost threshold, or invalid (<= 0), is
//! unclassified.

use crate::errors::EngineError;
use std::time::Duration;

/// Validated zone ladder. Configured once at startup; immutable afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneLadder {
    thresholds_m: Vec<f32>,
    cooldowns: Vec<Duration>,
}

impl ZoneLadder {
    /// Build a ladder from thresholds (meters) and cooldowns (one per zone)
    pub fn new(thresholds_m: Vec<f32>, cooldowns: Vec<Duration>) -> Result<Self, EngineError> {
        if thresholds_m.is_empty() {
            return Err(EngineError::Config("ladder has no thresholds".into()));
        }
        if thresholds_m.len() != cooldowns.len() {
            return Err(EngineError::Config(format!(
                "ladder has {} thresholds but {} cooldowns",
                thresholds_m.len(),
                cooldowns.len()
            )));
        }
        let mut prev = 0.0f32;
        for &t in &thresholds_m {
            if !t.is_finite() || t <= prev {
                return Err(EngineError::Config(format!(
                    "thresholds must be finite and strictly ascending from 0, got {} after {}",
                    t, prev
                )));
            }
            prev = t;
        }
        Ok(Self {
            thresholds_m,
            cooldowns,
        })
    }

    /// Build a ladder with cooldowns given in milliseconds
    pub fn from_ms(thresholds_m: &[f32], cooldowns_ms: &[u64]) -> Result<Self, EngineError> {
        Self::new(
            thresholds_m.to_vec(),
            cooldowns_ms.iter().map(|&ms| Duration::from_millis(ms)).collect(),
        )
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.thresholds_m.len()
    }

    /// Always false; an empty ladder cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.thresholds_m.is_empty()
    }

    /// Upper threshold of zone `i` in meters
    pub fn threshold_m(&self, zone: usize) -> f32 {
        self.thresholds_m[zone]
    }

    /// Minimum re-alert interval for zone `i`
    pub fn cooldown(&self, zone: usize) -> Duration {
        self.cooldowns[zone]
    }

    /// Outermost threshold; distances at or beyond it are unclassified
    pub fn outer_limit_m(&self) -> f32 {
        *self.thresholds_m.last().expect("ladder is never empty")
    }

    /// Classify a distance: the smallest zone `i` with `distance < t[i]`,
    /// or `None` for invalid (<= 0) or beyond-the-ladder distances.
    pub fn zone_for(&self, distance_m: f32) -> Option<usize> {
        if distance_m <= 0.0 {
            return None;
        }
        self.thresholds_m.iter().position(|&t| distance_m < t)
    }

    /// Human-readable band label for a zone, e.g. `"<0.3m"` or `"0.5-1.0m"`
    pub fn band_label(&self, zone: usize) -> String {
        if zone == 0 {
            format!("<{}m", self.thresholds_m[0])
        } else {
            format!("{}-{}m", self.thresholds_m[zone - 1], self.thresholds_m[zone])
        }
    }
}

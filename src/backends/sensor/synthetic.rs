// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic depth source
//!
//! Generates frames of a flat backdrop with a rectangular target whose
//! distance oscillates between a near and a far bound, sweeping through
//! every ladder band. Used by the terminal viewer, the demo commands, and
//! tests that need an end-to-end session without hardware.

use super::{DepthFrame, DepthSession, SessionConfig};
use crate::errors::SensorError;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Backdrop distance behind the moving target (mm)
const BACKDROP_MM: u16 = 3_500;

/// Width of the invalid (no-return) border, imitating sensor edge dropout
const INVALID_BORDER_PX: u32 = 4;

/// Synthetic moving-target session
pub struct SyntheticSession {
    config: SessionConfig,
    /// Nearest the target approaches (mm)
    near_mm: u16,
    /// Farthest the target retreats (mm)
    far_mm: u16,
    /// Frames for one full near-far-near sweep
    period_frames: u32,
    sequence: u32,
    /// When false, frames are produced without sleeping (tests)
    paced: bool,
    last_frame_at: Option<Instant>,
    closed: bool,
}

impl SyntheticSession {
    /// Open a paced session at the configured frame rate
    pub fn open(config: SessionConfig) -> Self {
        debug!(
            width = config.width,
            height = config.height,
            frame_rate = config.frame_rate,
            "Opening synthetic depth session"
        );
        Self {
            config,
            near_mm: 250,
            far_mm: 2_800,
            period_frames: config.frame_rate.max(1) * 8,
            sequence: 0,
            paced: true,
            last_frame_at: None,
            closed: false,
        }
    }

    /// Open an unpaced session that never sleeps; for tests
    pub fn open_unpaced(config: SessionConfig) -> Self {
        let mut session = Self::open(config);
        session.paced = false;
        session
    }

    /// Target distance for a frame index: triangle wave between the bounds
    fn target_mm(&self, sequence: u32) -> u16 {
        let half = self.period_frames / 2;
        let phase = sequence % self.period_frames;
        let span = (self.far_mm - self.near_mm) as u32;
        let offset = if phase < half {
            // Approaching
            span - span * phase / half.max(1)
        } else {
            // Retreating
            span * (phase - half) / half.max(1)
        };
        self.near_mm + offset as u16
    }

    fn build_frame(&self, sequence: u32) -> DepthFrame {
        let (w, h) = (self.config.width, self.config.height);
        let mut samples = vec![BACKDROP_MM; (w * h) as usize];

        // Invalid border
        for y in 0..h {
            for x in 0..w {
                if x < INVALID_BORDER_PX
                    || y < INVALID_BORDER_PX
                    || x >= w - INVALID_BORDER_PX
                    || y >= h - INVALID_BORDER_PX
                {
                    samples[(y * w + x) as usize] = 0;
                }
            }
        }

        // Centered target rectangle, one quarter of the frame
        let target = self.target_mm(sequence);
        let (tw, th) = (w / 4, h / 4);
        let (x0, y0) = (w / 2 - tw / 2, h / 2 - th / 2);
        for y in y0..y0 + th {
            for x in x0..x0 + tw {
                samples[(y * w + x) as usize] = target;
            }
        }

        DepthFrame::new(w, h, Arc::from(samples), sequence)
    }
}

impl DepthSession for SyntheticSession {
    fn wait_next_frame(&mut self) -> Result<DepthFrame, SensorError> {
        if self.closed {
            return Err(SensorError::Disconnected);
        }

        if self.paced {
            let period = self.config.frame_period();
            if let Some(last) = self.last_frame_at {
                let elapsed = last.elapsed();
                if elapsed < period {
                    std::thread::sleep(period - elapsed);
                }
            }
            self.last_frame_at = Some(Instant::now());
        }

        let frame = self.build_frame(self.sequence);
        self.sequence = self.sequence.wrapping_add(1);
        Ok(frame)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn close(&mut self) -> Result<(), SensorError> {
        debug!("Closing synthetic depth session");
        self.closed = true;
        Ok(())
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Depth sensor session abstraction
//!
//! A real range-sensor driver is an external collaborator: it only needs to
//! implement [`DepthSession`] and hand out [`DepthFrame`]s. This crate ships
//! a synthetic moving-target source and a raw-file playback source, both of
//! which are enough to exercise the full pipeline.

pub mod playback;
pub mod synthetic;

use crate::constants::{DEFAULT_FRAME_RATE, DEFAULT_HEIGHT, DEFAULT_WIDTH, MM_PER_M};
use crate::errors::SensorError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// One depth frame: an immutable per-tick snapshot of range samples.
///
/// Samples are millimeters with 0 marking "invalid / no return". The frame
/// origin is top-left and the buffer is row-major.
#[derive(Debug, Clone)]
pub struct DepthFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Depth samples in millimeters (0 = invalid)
    pub depth_mm: Arc<[u16]>,
    /// Frame sequence number
    pub sequence: u32,
    /// Timestamp when the frame was captured
    pub captured_at: Instant,
}

impl DepthFrame {
    /// Create a frame over the given sample buffer
    ///
    /// The buffer length must equal `width * height`.
    pub fn new(width: u32, height: u32, depth_mm: Arc<[u16]>, sequence: u32) -> Self {
        debug_assert_eq!(depth_mm.len(), (width * height) as usize);
        Self {
            width,
            height,
            depth_mm,
            sequence,
            captured_at: Instant::now(),
        }
    }

    /// Whether `(x, y)` lies inside the frame
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Distance at `(x, y)` in meters; `0.0` means invalid / no return
    pub fn distance_m(&self, x: u32, y: u32) -> f32 {
        debug_assert!(self.contains(x, y));
        let idx = (y * self.width + x) as usize;
        self.depth_mm[idx] as f32 / MM_PER_M
    }

    /// Number of samples in the frame
    pub fn pixel_count(&self) -> usize {
        self.depth_mm.len()
    }
}

/// Parameters for opening a sensor session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Frame rate in Hz
    pub frame_rate: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

impl SessionConfig {
    /// Nominal duration of one frame period
    pub fn frame_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }
}

/// An open depth sensor session
///
/// `wait_next_frame` blocks for up to one frame period. A transient gap is
/// reported as [`SensorError::FrameTimeout`] (the caller skips the tick);
/// [`SensorError::Disconnected`] is fatal and ends the session.
pub trait DepthSession {
    /// Block until the next frame is available
    fn wait_next_frame(&mut self) -> Result<DepthFrame, SensorError>;

    /// Fixed session resolution (width, height)
    fn resolution(&self) -> (u32, u32);

    /// Release the sensor. Further frame waits return `Disconnected`.
    fn close(&mut self) -> Result<(), SensorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_conversion() {
        let samples: Arc<[u16]> = vec![0u16, 500, 1_200, 3_750].into();
        let frame = DepthFrame::new(2, 2, samples, 0);

        assert_eq!(frame.distance_m(0, 0), 0.0);
        assert_eq!(frame.distance_m(1, 0), 0.5);
        assert_eq!(frame.distance_m(0, 1), 1.2);
        assert_eq!(frame.distance_m(1, 1), 3.75);
    }

    #[test]
    fn test_contains() {
        let frame = DepthFrame::new(4, 2, vec![0u16; 8].into(), 0);
        assert!(frame.contains(3, 1));
        assert!(!frame.contains(4, 1));
        assert!(!frame.contains(0, 2));
    }
}

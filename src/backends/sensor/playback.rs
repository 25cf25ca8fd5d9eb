// SPDX-License-Identifier: GPL-3.0-only

//! Raw depth recording playback
//!
//! Plays back a recording of raw depth frames: consecutive width*height
//! grids of little-endian u16 millimeter samples with no container or
//! per-frame header. Useful for replaying captured scenes through the
//! engine without the sensor attached.

use super::{DepthFrame, DepthSession, SessionConfig};
use crate::errors::SensorError;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Depth recording playback session
pub struct PlaybackSession {
    config: SessionConfig,
    frames: Vec<Arc<[u16]>>,
    cursor: usize,
    sequence: u32,
    /// Restart from the first frame at end-of-file instead of disconnecting
    looped: bool,
    paced: bool,
    last_frame_at: Option<Instant>,
    closed: bool,
}

impl PlaybackSession {
    /// Load a raw little-endian recording. The file length must be a whole
    /// number of `width * height * 2`-byte frames.
    pub fn open(path: &Path, config: SessionConfig, looped: bool) -> Result<Self, SensorError> {
        let bytes = std::fs::read(path).map_err(|e| {
            SensorError::InitializationFailed(format!("{}: {}", path.display(), e))
        })?;

        let frame_bytes = (config.width * config.height) as usize * 2;
        if frame_bytes == 0 || bytes.is_empty() || bytes.len() % frame_bytes != 0 {
            return Err(SensorError::Backend(format!(
                "{}: {} bytes is not a whole number of {}x{} u16 frames",
                path.display(),
                bytes.len(),
                config.width,
                config.height
            )));
        }

        let mut frames = Vec::with_capacity(bytes.len() / frame_bytes);
        for chunk in bytes.chunks_exact(frame_bytes) {
            let mut samples = vec![0u16; frame_bytes / 2];
            bytemuck::cast_slice_mut::<u16, u8>(&mut samples).copy_from_slice(chunk);
            // Recordings are little-endian on disk; no-op on LE targets
            for sample in &mut samples {
                *sample = u16::from_le(*sample);
            }
            frames.push(Arc::from(samples));
        }

        info!(
            path = %path.display(),
            frames = frames.len(),
            width = config.width,
            height = config.height,
            "Loaded depth recording"
        );

        Ok(Self {
            config,
            frames,
            cursor: 0,
            sequence: 0,
            looped,
            paced: true,
            last_frame_at: None,
            closed: false,
        })
    }

    /// Disable frame pacing; for tests
    pub fn set_unpaced(&mut self) {
        self.paced = false;
    }

    /// Number of frames in the recording
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl DepthSession for PlaybackSession {
    fn wait_next_frame(&mut self) -> Result<DepthFrame, SensorError> {
        if self.closed {
            return Err(SensorError::Disconnected);
        }
        if self.cursor >= self.frames.len() {
            if !self.looped {
                return Err(SensorError::Disconnected);
            }
            debug!("Recording exhausted, restarting playback");
            self.cursor = 0;
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

        let samples = Arc::clone(&self.frames[self.cursor]);
        self.cursor += 1;
        let frame = DepthFrame::new(self.config.width, self.config.height, samples, self.sequence);
        self.sequence = self.sequence.wrapping_add(1);
        Ok(frame)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn close(&mut self) -> Result<(), SensorError> {
        debug!("Closing playback session");
        self.closed = true;
        Ok(())
    }
}

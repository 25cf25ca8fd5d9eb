// SPDX-License-Identifier: GPL-3.0-only

//! Per-frame zone classification
//!
//! Reduces a full depth frame to a per-pixel zone grid plus the closest
//! valid distance and its location, in one flat-buffer pass. This pass is
//! the dominant per-frame cost (W*H samples) and must finish within one
//! frame period at the sensor's rate, so it stays a straight scan over the
//! sample buffer with no per-pixel indirection.

use super::ladder::ZoneLadder;
use crate::backends::sensor::DepthFrame;
use crate::constants::MM_PER_M;

/// Per-frame classification output. Recomputed fresh every tick; no
/// history is retained.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Closest valid distance in the frame (meters), `INFINITY` if none
    pub closest_m: f32,
    /// Location of the closest valid sample, `None` if the frame had none
    pub closest_at: Option<(u32, u32)>,
    width: u32,
    height: u32,
    zones: Vec<Option<u8>>,
}

impl ClassificationResult {
    /// Zone index at `(x, y)`, or `None` for invalid / beyond-ladder pixels
    pub fn zone_at(&self, x: u32, y: u32) -> Option<u8> {
        debug_assert!(x < self.width && y < self.height);
        self.zones[(y * self.width + x) as usize]
    }

    /// Row-major zone grid
    pub fn zones(&self) -> &[Option<u8>] {
        &self.zones
    }

    /// Grid dimensions (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether any valid sample was seen
    pub fn has_target(&self) -> bool {
        self.closest_at.is_some()
    }
}

/// Classify every pixel of a frame and track the closest valid distance.
///
/// Invalid samples (0) are unclassified and excluded from the closest
/// reduction. Ties for the minimum keep the first sample in row-major scan
/// order; callers must not depend on a particular tie winner beyond
/// determinism.
pub fn classify(frame: &DepthFrame, ladder: &ZoneLadder) -> ClassificationResult {
    let mut zones = Vec::with_capacity(frame.pixel_count());
    let mut closest_mm = u16::MAX;
    let mut closest_idx: Option<usize> = None;

    for (idx, &mm) in frame.depth_mm.iter().enumerate() {
        if mm == 0 {
            zones.push(None);
            continue;
        }
        // closest_idx is the authority: the first valid sample always wins
        // (even at u16::MAX); the strict comparison afterward keeps the
        // first of equal minima in scan order
        if closest_idx.is_none() || mm < closest_mm {
            closest_mm = mm;
            closest_idx = Some(idx);
        }
        zones.push(ladder.zone_for(mm as f32 / MM_PER_M).map(|z| z as u8));
    }

    let (closest_m, closest_at) = match closest_idx {
        Some(idx) => {
            let x = (idx as u32) % frame.width;
            let y = (idx as u32) / frame.width;
            (closest_mm as f32 / MM_PER_M, Some((x, y)))
        }
        None => (f32::INFINITY, None),
    };

    ClassificationResult {
        closest_m,
        closest_at,
        width: frame.width,
        height: frame.height,
        zones,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::sensor::DepthFrame;
    use std::sync::Arc;

    fn ladder() -> ZoneLadder {
        ZoneLadder::from_ms(&[0.3, 0.5, 1.0, 2.0], &[100, 1_500, 2_500, 5_000]).unwrap()
    }

    fn frame(width: u32, height: u32, mm: Vec<u16>) -> DepthFrame {
        DepthFrame::new(width, height, Arc::from(mm), 0)
    }

    #[test]
    fn test_closest_is_true_minimum_of_valid_samples() {
        // Invalid zeros must be excluded from the reduction
        let f = frame(3, 2, vec![0, 2_400, 900, 0, 350, 1_800]);
        let result = classify(&f, &ladder());

        assert_eq!(result.closest_m, 0.35);
        assert_eq!(result.closest_at, Some((1, 1)));
    }

    #[test]
    fn test_tie_keeps_first_in_scan_order() {
        let f = frame(2, 2, vec![700, 500, 500, 900]);
        let result = classify(&f, &ladder());

        assert_eq!(result.closest_m, 0.5);
        assert_eq!(result.closest_at, Some((1, 0)));
    }

    #[test]
    fn test_max_representable_sample_is_a_valid_minimum() {
        // 65535 mm is a legal reading and must survive the reduction
        let f = frame(2, 2, vec![u16::MAX; 4]);
        let result = classify(&f, &ladder());

        assert_eq!(result.closest_m, 65.535);
        assert_eq!(result.closest_at, Some((0, 0)));
        assert!(result.has_target());
    }

    #[test]
    fn test_all_invalid_frame() {
        let f = frame(4, 4, vec![0u16; 16]);
        let result = classify(&f, &ladder());

        assert_eq!(result.closest_m, f32::INFINITY);
        assert_eq!(result.closest_at, None);
        assert!(!result.has_target());
        assert!(result.zones().iter().all(|z| z.is_none()));
    }

    #[test]
    fn test_zone_grid_matches_ladder() {
        // 0.2m -> zone 0, 0.4m -> zone 1, 0.9m -> zone 2, 1.5m -> zone 3,
        // 2.5m -> beyond the ladder, 0 -> invalid
        let f = frame(3, 2, vec![200, 400, 900, 1_500, 2_500, 0]);
        let result = classify(&f, &ladder());

        assert_eq!(result.zone_at(0, 0), Some(0));
        assert_eq!(result.zone_at(1, 0), Some(1));
        assert_eq!(result.zone_at(2, 0), Some(2));
        assert_eq!(result.zone_at(0, 1), Some(3));
        assert_eq!(result.zone_at(1, 1), None);
        assert_eq!(result.zone_at(2, 1), None);
    }

    #[test]
    fn test_closest_against_naive_reduction() {
        // Pseudo-random grid; compare the single-pass result to a naive
        // second traversal.
        let mut seed = 0x2545F491u32;
        let mut samples = Vec::with_capacity(64 * 48);
        for _ in 0..64 * 48 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            samples.push((seed % 4_096) as u16);
        }
        let f = frame(64, 48, samples.clone());
        let result = classify(&f, &ladder());

        let naive = samples
            .iter()
            .filter(|&&mm| mm > 0)
            .min()
            .map(|&mm| mm as f32 / MM_PER_M)
            .unwrap_or(f32::INFINITY);
        assert_eq!(result.closest_m, naive);
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Zone visualization helpers
//!
//! Turns classification results into RGBA pixels: a fixed urgency palette
//! (red = nearest band through green = outermost), black for invalid or
//! beyond-ladder pixels, and a PNG snapshot export. The engine itself makes
//! no assumption about colors; this module is the default render
//! collaborator.

use crate::engine::classifier::ClassificationResult;
use crate::engine::ladder::ZoneLadder;
use crate::errors::EngineError;
use std::path::Path;

/// Urgency palette, nearest band first: red, orange, yellow, green (RGBA).
/// Ladders with more tiers than palette entries reuse the outermost color.
pub const ZONE_COLORS: [[u8; 4]; 4] = [
    [255, 0, 0, 255],
    [255, 165, 0, 255],
    [255, 255, 0, 255],
    [0, 255, 0, 255],
];

/// Color for invalid or beyond-ladder pixels
pub const UNCLASSIFIED_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Marker color for the closest pixel in snapshots
const CLOSEST_MARKER_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Color for a zone tier, clamping to the outermost palette entry
pub fn zone_color(zone: usize) -> [u8; 4] {
    ZONE_COLORS[zone.min(ZONE_COLORS.len() - 1)]
}

/// Compose the zone grid into an RGBA buffer (4 bytes per pixel)
pub fn compose_overlay(result: &ClassificationResult) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(result.zones().len() * 4);
    for zone in result.zones() {
        let color = match zone {
            Some(z) => zone_color(*z as usize),
            None => UNCLASSIFIED_COLOR,
        };
        rgba.extend_from_slice(&color);
    }
    rgba
}

/// Legend entries for a ladder: band label and color, nearest first
pub fn legend(ladder: &ZoneLadder) -> Vec<(String, [u8; 4])> {
    (0..ladder.len())
        .map(|zone| (ladder.band_label(zone), zone_color(zone)))
        .collect()
}

/// Render a classified frame to a PNG file, marking the closest pixel
/// with a small white cross.
pub fn save_snapshot(result: &ClassificationResult, path: &Path) -> Result<(), EngineError> {
    let (width, height) = result.dimensions();
    let mut rgba = compose_overlay(result);

    if let Some((cx, cy)) = result.closest_at {
        for (dx, dy) in [(0i64, 0i64), (-1, 0), (1, 0), (0, -1), (0, 1)] {
            let x = cx as i64 + dx;
            let y = cy as i64 + dy;
            if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                let idx = ((y as u32 * width + x as u32) * 4) as usize;
                rgba[idx..idx + 4].copy_from_slice(&CLOSEST_MARKER_COLOR);
            }
        }
    }

    let image = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| EngineError::Render("overlay buffer size mismatch".into()))?;
    image
        .save(path)
        .map_err(|e| EngineError::Render(format!("{}: {}", path.display(), e)))
}

// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the engine tick pipeline

use depth_sentinel::backends::sensor::DepthFrame;
use depth_sentinel::engine::{Engine, QueryPolicy, ZoneLadder};
use depth_sentinel::storage::DistanceLog;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;

fn standard_ladder() -> ZoneLadder {
    ZoneLadder::from_ms(&[0.3, 0.5, 1.0, 2.0], &[100, 1_500, 2_500, 5_000]).unwrap()
}

fn standard_engine() -> Engine {
    Engine::new(
        standard_ladder(),
        WIDTH,
        HEIGHT,
        Duration::from_millis(3_000),
        QueryPolicy::OverlayUntilExpiry,
    )
}

/// Frame filled with a single depth value
fn uniform_frame(depth_mm: u16, sequence: u32) -> DepthFrame {
    let pixels: Arc<[u16]> = vec![depth_mm; (WIDTH * HEIGHT) as usize].into();
    DepthFrame::new(WIDTH, HEIGHT, pixels, sequence)
}

/// Far backdrop with one pixel overridden
fn frame_with_pixel(x: u32, y: u32, depth_mm: u16, sequence: u32) -> DepthFrame {
    let mut pixels = vec![3_500u16; (WIDTH * HEIGHT) as usize];
    pixels[(y * WIDTH + x) as usize] = depth_mm;
    DepthFrame::new(WIDTH, HEIGHT, pixels.into(), sequence)
}

#[test]
fn test_alert_debounce_across_ticks() {
    // A target steady at 0.9 m sits in the third band (cooldown 2500 ms).
    // With ticks 2000 ms apart the alert fires on ticks 1 and 3 only:
    // tick 2 is inside the cooldown window, tick 3 is 4000 ms after the
    // last emission.
    let mut engine = standard_engine();
    let t0 = Instant::now();

    let fired: Vec<bool> = (0..3)
        .map(|i| {
            let frame = uniform_frame(900, i);
            let now = t0 + Duration::from_millis(2_000 * i as u64);
            engine.tick(&frame, now).alert.is_some()
        })
        .collect();

    assert_eq!(fired, vec![true, false, true]);
}

#[test]
fn test_alert_carries_zone_and_distance() {
    let mut engine = standard_engine();
    let frame = uniform_frame(900, 0);

    let alert = engine.tick(&frame, Instant::now()).alert.unwrap();
    assert_eq!(alert.zone, 2);
    assert!((alert.distance_m - 0.9).abs() < 1e-6);
}

#[test]
fn test_approaching_target_switches_tier() {
    // Moving from the 1 m band into the 0.5 m band retriggers immediately:
    // each tier debounces independently.
    let mut engine = standard_engine();
    let t0 = Instant::now();

    let first = engine.tick(&uniform_frame(900, 0), t0).alert.unwrap();
    let second = engine
        .tick(&uniform_frame(400, 1), t0 + Duration::from_millis(100))
        .alert
        .unwrap();

    assert_eq!(first.zone, 2);
    assert_eq!(second.zone, 1);
}

#[test]
fn test_all_invalid_frame_is_quiet() {
    let mut engine = standard_engine();
    let frame = uniform_frame(0, 0);

    let output = engine.tick(&frame, Instant::now());
    assert!(output.alert.is_none());
    assert!(!output.classification.has_target());
    assert!(output.classification.closest_m.is_infinite());
}

#[test]
fn test_max_representable_depth_is_still_classified() {
    // A frame full of 65535 mm samples has a real closest distance; it is
    // far beyond the ladder so nothing fires, but it is not "no target".
    let mut engine = standard_engine();
    let output = engine.tick(&uniform_frame(u16::MAX, 0), Instant::now());

    assert_eq!(output.classification.closest_m, 65.535);
    assert!(output.classification.has_target());
    assert!(output.alert.is_none());
}

#[test]
fn test_query_lifecycle_with_ttl() {
    // Submit a query at t=0 against a pixel at 1.2 m. It overlays the live
    // distance until 3000 ms have passed, then disappears. The CSV record
    // is produced exactly once, from the first frame that resolved it.
    let mut engine = standard_engine();
    let t0 = Instant::now();
    engine.submit_click(10, 10, t0).unwrap();

    let out = engine.tick(
        &frame_with_pixel(10, 10, 1_200, 0),
        t0 + Duration::from_millis(500),
    );
    assert_eq!(out.display.len(), 1);
    assert!((out.display[0].distance_m - 1.2).abs() < 1e-6);
    assert_eq!(out.records.len(), 1);
    assert!((out.records[0].distance_m - 1.2).abs() < 1e-6);

    // The target moved; the overlay tracks the live frame but no second
    // record is written
    let out = engine.tick(
        &frame_with_pixel(10, 10, 950, 1),
        t0 + Duration::from_millis(2_900),
    );
    assert_eq!(out.display.len(), 1);
    assert!((out.display[0].distance_m - 0.95).abs() < 1e-6);
    assert!(out.records.is_empty());

    // Past the TTL the query is gone
    let out = engine.tick(
        &frame_with_pixel(10, 10, 950, 2),
        t0 + Duration::from_millis(3_500),
    );
    assert!(out.display.is_empty());
    assert!(out.records.is_empty());
}

#[test]
fn test_query_on_invalid_pixel_reports_zero() {
    let mut engine = standard_engine();
    let t0 = Instant::now();
    engine.submit_click(5, 5, t0).unwrap();

    let out = engine.tick(
        &frame_with_pixel(5, 5, 0, 0),
        t0 + Duration::from_millis(100),
    );
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].distance_m, 0.0);
}

#[test]
fn test_out_of_range_click_rejected() {
    let mut engine = standard_engine();
    assert!(engine.submit_click(WIDTH, 0, Instant::now()).is_err());
    assert!(engine.submit_click(0, HEIGHT, Instant::now()).is_err());
}

#[test]
fn test_records_flow_into_csv_log() {
    let dir = std::env::temp_dir().join("depth-sentinel-engine-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path: PathBuf = dir.join(format!("session_{}.csv", std::process::id()));

    let mut engine = standard_engine();
    let mut log = DistanceLog::create(&path).unwrap();
    let t0 = Instant::now();

    engine.submit_click(20, 30, t0).unwrap();
    let out = engine.tick(
        &frame_with_pixel(20, 30, 1_234, 0),
        t0 + Duration::from_millis(100),
    );
    for record in &out.records {
        log.append(record).unwrap();
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec!["X, Y, Distance (m)", "20,30,1.23"]);

    std::fs::remove_file(&path).ok();
}

// SPDX-License-Identifier: GPL-3.0-only

//! Time-windowed point-query tracker
//!
//! Click/tap events enqueue a query for the distance at a pixel. Each tick
//! every live query is re-resolved against the *current* frame (the object
//! may have moved since submission) and surfaced for display; the first
//! resolution also emits a persisted record. Queries older than the TTL are
//! dropped without re-resolution. Entries are processed in submission order
//! because the log output order is externally observable.

use crate::backends::sensor::DepthFrame;
use crate::errors::QueryError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// What happens to a query after its first resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryPolicy {
    /// Persist one record, then keep re-resolving and displaying the query
    /// every tick until the TTL expires (no re-logging)
    #[default]
    OverlayUntilExpiry,
    /// Persist one record and drop the query immediately
    LogAndDrop,
}

/// One pending point query
#[derive(Debug, Clone, Copy)]
struct QueryEntry {
    x: u32,
    y: u32,
    requested_at: Instant,
    logged: bool,
}

/// A resolved query surfaced for rendering this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayItem {
    pub x: u32,
    pub y: u32,
    pub distance_m: f32,
}

/// An append-only distance record; one row per resolved query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistedRecord {
    pub x: u32,
    pub y: u32,
    pub distance_m: f32,
}

/// Output of one tracker tick
#[derive(Debug, Default)]
pub struct ResolvedQueries {
    /// Items to render this tick, in submission order
    pub display: Vec<DisplayItem>,
    /// Records to append to the distance log, in submission order
    pub records: Vec<PersistedRecord>,
}

/// Bounded-lifetime queue of point queries
#[derive(Debug)]
pub struct QueryTracker {
    width: u32,
    height: u32,
    ttl: Duration,
    policy: QueryPolicy,
    entries: VecDeque<QueryEntry>,
}

impl QueryTracker {
    /// Tracker for a session with fixed frame dimensions
    pub fn new(width: u32, height: u32, ttl: Duration, policy: QueryPolicy) -> Self {
        Self {
            width,
            height,
            ttl,
            policy,
            entries: VecDeque::new(),
        }
    }

    /// Enqueue a point query.
    ///
    /// Out-of-range coordinates never enter the queue and do not affect
    /// other entries.
    pub fn submit(&mut self, x: u32, y: u32, now: Instant) -> Result<(), QueryError> {
        if x >= self.width || y >= self.height {
            return Err(QueryError::OutOfRange { x, y });
        }
        self.entries.push_back(QueryEntry {
            x,
            y,
            requested_at: now,
            logged: false,
        });
        Ok(())
    }

    /// Resolve every live query against the current frame.
    ///
    /// The TTL boundary is inclusive: a query submitted at `T` is still
    /// resolved at `T + TTL` and dropped after. An invalid depth (0.0) at
    /// the queried pixel is surfaced as-is; it is data, not an error.
    pub fn tick(&mut self, frame: &DepthFrame, now: Instant) -> ResolvedQueries {
        let mut out = ResolvedQueries::default();
        let mut kept = VecDeque::with_capacity(self.entries.len());

        for mut entry in self.entries.drain(..) {
            if now.saturating_duration_since(entry.requested_at) > self.ttl {
                continue; // expired, dropped without re-resolution
            }

            let distance_m = frame.distance_m(entry.x, entry.y);
            out.display.push(DisplayItem {
                x: entry.x,
                y: entry.y,
                distance_m,
            });
            if !entry.logged {
                out.records.push(PersistedRecord {
                    x: entry.x,
                    y: entry.y,
                    distance_m,
                });
                entry.logged = true;
            }

            if self.policy == QueryPolicy::OverlayUntilExpiry {
                kept.push_back(entry);
            }
        }

        self.entries = kept;
        out
    }

    /// Number of live queries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no queries are pending
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn frame_filled(width: u32, height: u32, mm: u16) -> DepthFrame {
        DepthFrame::new(width, height, vec![mm; (width * height) as usize].into(), 0)
    }

    fn frame_with(width: u32, height: u32, fill: u16, at: (u32, u32), mm: u16) -> DepthFrame {
        let mut samples = vec![fill; (width * height) as usize];
        samples[(at.1 * width + at.0) as usize] = mm;
        DepthFrame::new(width, height, Arc::from(samples), 0)
    }

    fn tracker(policy: QueryPolicy) -> QueryTracker {
        QueryTracker::new(640, 480, Duration::from_secs(3), policy)
    }

    #[test]
    fn test_out_of_range_rejected_at_submit() {
        let mut t = tracker(QueryPolicy::OverlayUntilExpiry);
        let now = Instant::now();

        assert_eq!(
            t.submit(640, 10, now),
            Err(QueryError::OutOfRange { x: 640, y: 10 })
        );
        assert_eq!(
            t.submit(10, 480, now),
            Err(QueryError::OutOfRange { x: 10, y: 480 })
        );
        assert!(t.is_empty());

        assert!(t.submit(639, 479, now).is_ok());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_overlay_resolves_against_current_frame_until_ttl() {
        let mut t = tracker(QueryPolicy::OverlayUntilExpiry);
        let t0 = Instant::now();
        t.submit(100, 50, t0).unwrap();

        // The object moves between ticks; each resolution uses the frame
        // of that tick, not the distance at request time.
        let out = t.tick(
            &frame_with(640, 480, 3_000, (100, 50), 1_200),
            t0 + Duration::from_millis(500),
        );
        assert_eq!(out.display, vec![DisplayItem { x: 100, y: 50, distance_m: 1.2 }]);
        assert_eq!(out.records.len(), 1, "logged exactly once");

        let out = t.tick(
            &frame_with(640, 480, 3_000, (100, 50), 950),
            t0 + Duration::from_millis(2_900),
        );
        assert_eq!(out.display, vec![DisplayItem { x: 100, y: 50, distance_m: 0.95 }]);
        assert!(out.records.is_empty(), "no re-logging after first resolution");

        // Past the TTL the query is gone
        let out = t.tick(
            &frame_filled(640, 480, 3_000),
            t0 + Duration::from_millis(3_500),
        );
        assert!(out.display.is_empty());
        assert!(t.is_empty());
    }

    #[test]
    fn test_ttl_boundary_is_inclusive() {
        let mut t = tracker(QueryPolicy::OverlayUntilExpiry);
        let t0 = Instant::now();
        t.submit(5, 5, t0).unwrap();

        let out = t.tick(&frame_filled(640, 480, 1_000), t0 + Duration::from_secs(3));
        assert_eq!(out.display.len(), 1);

        let out = t.tick(
            &frame_filled(640, 480, 1_000),
            t0 + Duration::from_secs(3) + Duration::from_millis(1),
        );
        assert!(out.display.is_empty());
    }

    #[test]
    fn test_log_and_drop_removes_after_first_resolution() {
        let mut t = tracker(QueryPolicy::LogAndDrop);
        let t0 = Instant::now();
        t.submit(10, 20, t0).unwrap();

        let out = t.tick(&frame_filled(640, 480, 750), t0 + Duration::from_millis(30));
        assert_eq!(out.display.len(), 1);
        assert_eq!(
            out.records,
            vec![PersistedRecord { x: 10, y: 20, distance_m: 0.75 }]
        );
        assert!(t.is_empty());

        let out = t.tick(&frame_filled(640, 480, 750), t0 + Duration::from_millis(60));
        assert!(out.display.is_empty());
        assert!(out.records.is_empty());
    }

    #[test]
    fn test_submission_order_is_preserved() {
        let mut t = tracker(QueryPolicy::OverlayUntilExpiry);
        let t0 = Instant::now();
        for (i, xy) in [(3u32, 4u32), (1, 1), (9, 9)].iter().enumerate() {
            t.submit(xy.0, xy.1, t0 + Duration::from_millis(i as u64))
                .unwrap();
        }

        let out = t.tick(&frame_filled(640, 480, 1_000), t0 + Duration::from_millis(10));
        let order: Vec<(u32, u32)> = out.display.iter().map(|d| (d.x, d.y)).collect();
        assert_eq!(order, vec![(3, 4), (1, 1), (9, 9)]);
    }

    #[test]
    fn test_invalid_depth_is_surfaced_as_data() {
        let mut t = tracker(QueryPolicy::OverlayUntilExpiry);
        let t0 = Instant::now();
        t.submit(0, 0, t0).unwrap();

        let out = t.tick(&frame_filled(640, 480, 0), t0 + Duration::from_millis(10));
        assert_eq!(out.display[0].distance_m, 0.0);
        assert_eq!(out.records[0].distance_m, 0.0);
    }

    #[test]
    fn test_many_simultaneous_queries_within_one_window() {
        let mut t = tracker(QueryPolicy::OverlayUntilExpiry);
        let t0 = Instant::now();
        for i in 0..20u32 {
            t.submit(i, i, t0 + Duration::from_millis(i as u64 * 10))
                .unwrap();
        }

        let out = t.tick(&frame_filled(640, 480, 500), t0 + Duration::from_millis(250));
        assert_eq!(out.display.len(), 20);
        assert_eq!(out.records.len(), 20);
        assert_eq!(t.len(), 20);
    }
}

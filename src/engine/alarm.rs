// SPDX-License-Identifier: GPL-3.0-only

//! Debounced multi-tier alarm state machine
//!
//! One last-fire timestamp per zone tier. On each tick the nearest breached
//! tier alone is considered: if its cooldown has elapsed an alert fires and
//! only that tier's timestamp is updated. While its cooldown is running no
//! other (farther) tier is consulted, which prevents both tier-skipping and
//! alert storms while letting a sustained close approach re-alert faster
//! than a borderline one.

use super::ladder::ZoneLadder;
use std::time::Instant;

/// One alert, carrying the breached zone tier and the triggering distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertEvent {
    /// Breached zone tier (0 = nearest band)
    pub zone: usize,
    /// Closest distance that triggered the alert (meters)
    pub distance_m: f32,
}

/// Per-zone last-fire timestamps. The only alarm state carried from frame
/// to frame; owned by the session, mutated only through [`maybe_alert`].
#[derive(Debug, Clone)]
pub struct AlarmState {
    last_fired: Vec<Option<Instant>>,
}

impl AlarmState {
    /// Fresh state sized to a ladder; no zone has ever fired
    pub fn new(zones: usize) -> Self {
        Self {
            last_fired: vec![None; zones],
        }
    }

    /// Number of zone tiers tracked
    pub fn zones(&self) -> usize {
        self.last_fired.len()
    }

    /// When zone `i` last fired, if ever
    pub fn last_fired(&self, zone: usize) -> Option<Instant> {
        self.last_fired[zone]
    }
}

/// Decide whether an alert fires for this tick.
///
/// Scans zones from nearest to farthest and stops at the first zone whose
/// threshold exceeds `closest_m` (the tier the closest object is inside or
/// nearer than). Fires only if that tier's cooldown has elapsed; otherwise
/// nothing fires this tick and no other tier is checked. A `closest_m` at
/// or beyond every threshold (including `INFINITY` for an all-invalid
/// frame) never fires and touches no state.
pub fn maybe_alert(
    closest_m: f32,
    now: Instant,
    ladder: &ZoneLadder,
    state: &mut AlarmState,
) -> Option<AlertEvent> {
    debug_assert_eq!(ladder.len(), state.zones());

    let zone = ladder.zone_for(closest_m)?;
    let elapsed_ok = match state.last_fired[zone] {
        None => true,
        Some(prev) => now.saturating_duration_since(prev) > ladder.cooldown(zone),
    };
    if !elapsed_ok {
        return None;
    }

    state.last_fired[zone] = Some(now);
    Some(AlertEvent {
        zone,
        distance_m: closest_m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ladder() -> ZoneLadder {
        ZoneLadder::from_ms(&[0.3, 0.5, 1.0, 2.0], &[100, 1_500, 2_500, 5_000]).unwrap()
    }

    #[test]
    fn test_first_breach_fires_immediately() {
        let ladder = ladder();
        let mut state = AlarmState::new(ladder.len());
        let now = Instant::now();

        let event = maybe_alert(0.9, now, &ladder, &mut state);
        assert_eq!(
            event,
            Some(AlertEvent {
                zone: 2,
                distance_m: 0.9
            })
        );
        assert_eq!(state.last_fired(2), Some(now));
    }

    #[test]
    fn test_cooldown_suppresses_refire() {
        let ladder = ladder();
        let mut state = AlarmState::new(ladder.len());
        let t0 = Instant::now();

        assert!(maybe_alert(0.9, t0, &ladder, &mut state).is_some());

        // Any number of ticks inside the 2500 ms cooldown stays silent
        for ms in [1u64, 500, 1_000, 2_400] {
            let now = t0 + Duration::from_millis(ms);
            assert!(maybe_alert(0.9, now, &ladder, &mut state).is_none());
        }

        // Strictly past the cooldown it fires again
        let now = t0 + Duration::from_millis(2_501);
        assert!(maybe_alert(0.9, now, &ladder, &mut state).is_some());
    }

    #[test]
    fn test_only_nearest_tier_fires() {
        let ladder = ladder();
        let mut state = AlarmState::new(ladder.len());
        let now = Instant::now();

        // 0.1 m is inside every band's reach; only zone 0 may fire
        let event = maybe_alert(0.1, now, &ladder, &mut state).unwrap();
        assert_eq!(event.zone, 0);
        for zone in 1..ladder.len() {
            assert_eq!(state.last_fired(zone), None, "farther tiers untouched");
        }
    }

    #[test]
    fn test_suppressed_tick_does_not_touch_farther_tiers() {
        let ladder = ladder();
        let mut state = AlarmState::new(ladder.len());
        let t0 = Instant::now();

        assert!(maybe_alert(0.2, t0, &ladder, &mut state).is_some());
        // Zone 0 cooldown (100 ms) not elapsed: no fallback to zone 1+
        let now = t0 + Duration::from_millis(50);
        assert!(maybe_alert(0.2, now, &ladder, &mut state).is_none());
        assert_eq!(state.last_fired(1), None);
    }

    #[test]
    fn test_boundary_distance_belongs_to_outer_tier() {
        let ladder = ladder();
        let mut state = AlarmState::new(ladder.len());
        let now = Instant::now();

        // Exactly t[0]: the half-open bands put it in zone 1
        let event = maybe_alert(0.3, now, &ladder, &mut state).unwrap();
        assert_eq!(event.zone, 1);
        assert_eq!(state.last_fired(0), None);
    }

    #[test]
    fn test_no_hazard_never_fires() {
        let ladder = ladder();
        let mut state = AlarmState::new(ladder.len());
        let now = Instant::now();

        assert!(maybe_alert(2.0, now, &ladder, &mut state).is_none());
        assert!(maybe_alert(9.9, now, &ladder, &mut state).is_none());
        assert!(maybe_alert(f32::INFINITY, now, &ladder, &mut state).is_none());
        assert!(state.last_fired.iter().all(|t| t.is_none()));
    }

    #[test]
    fn test_independent_cooldowns_per_tier() {
        let ladder = ladder();
        let mut state = AlarmState::new(ladder.len());
        let t0 = Instant::now();

        // Fire zone 2, then the object closes into zone 0: zone 0 has its
        // own (unfired) cooldown and fires at once.
        assert!(maybe_alert(0.9, t0, &ladder, &mut state).is_some());
        let event = maybe_alert(0.1, t0 + Duration::from_millis(10), &ladder, &mut state);
        assert_eq!(event.unwrap().zone, 0);
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Alert output collaborators
//!
//! The engine emits an abstract "fire alert for zone Z" event; a sink turns
//! it into something audible or visible. Sinks are fire-and-forget and must
//! not block the tick loop.

use crate::constants::tone_for_zone;
use crate::engine::alarm::AlertEvent;
use std::io::Write;
use tracing::info;

/// Consumes alert events. Implementations must be non-blocking.
pub trait AlertSink {
    fn fire(&mut self, event: &AlertEvent);
}

/// Console sink: terminal bell plus a structured log line carrying the
/// zone's tone parameters, so a downstream audio device can reproduce it.
#[derive(Debug, Default)]
pub struct ConsoleAlertSink;

impl AlertSink for ConsoleAlertSink {
    fn fire(&mut self, event: &AlertEvent) {
        let (freq_hz, duration_ms) = tone_for_zone(event.zone);
        info!(
            zone = event.zone,
            distance_m = format!("{:.2}", event.distance_m),
            freq_hz,
            duration_ms,
            "Proximity alert: object too close"
        );
        // BEL is the portable stand-in for a tone generator
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}

/// Sink that discards events; for sessions where alerts are rendered
/// elsewhere (e.g. the terminal viewer's status bar)
#[derive(Debug, Default)]
pub struct NullAlertSink;

impl AlertSink for NullAlertSink {
    fn fire(&mut self, _event: &AlertEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        fired: Vec<AlertEvent>,
    }

    impl AlertSink for RecordingSink {
        fn fire(&mut self, event: &AlertEvent) {
            self.fired.push(*event);
        }
    }

    #[test]
    fn test_sink_receives_events() {
        let mut sink = RecordingSink::default();
        let event = AlertEvent {
            zone: 1,
            distance_m: 0.42,
        };
        sink.fire(&event);
        assert_eq!(sink.fired, vec![event]);
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Frame orchestration
//!
//! Ties classifier, alarm debouncer and query tracker into a strictly
//! sequential per-tick pipeline: classify -> debounce alarm -> drain the
//! click queue -> resolve queries -> hand outputs to the collaborators.
//! The session loop around it blocks only on the frame wait, skips ticks
//! on transient frame gaps, and guarantees sensor release and log flush on
//! every exit path.

use super::alarm::{self, AlarmState, AlertEvent};
use super::classifier::{self, ClassificationResult};
use super::ladder::ZoneLadder;
use super::query::{DisplayItem, PersistedRecord, QueryPolicy, QueryTracker};
use crate::backends::alerts::AlertSink;
use crate::backends::input::ClickReceiver;
use crate::backends::sensor::{DepthFrame, DepthSession};
use crate::errors::{EngineError, QueryError, SensorError};
use crate::storage::DistanceLog;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Everything one tick produces for the collaborators
#[derive(Debug)]
pub struct TickOutput {
    pub classification: ClassificationResult,
    pub alert: Option<AlertEvent>,
    pub display: Vec<DisplayItem>,
    pub records: Vec<PersistedRecord>,
}

/// The proximity engine: all per-session state behind one tick interface.
///
/// Owns the ladder, the alarm timestamps and the query queue; a pure
/// function of (current frame, this state, wall clock) per tick.
#[derive(Debug)]
pub struct Engine {
    ladder: ZoneLadder,
    alarm: AlarmState,
    tracker: QueryTracker,
}

impl Engine {
    /// Engine for a session at a fixed resolution
    pub fn new(
        ladder: ZoneLadder,
        width: u32,
        height: u32,
        query_ttl: Duration,
        query_policy: QueryPolicy,
    ) -> Self {
        let alarm = AlarmState::new(ladder.len());
        let tracker = QueryTracker::new(width, height, query_ttl, query_policy);
        Self {
            ladder,
            alarm,
            tracker,
        }
    }

    /// Enqueue an operator point query
    pub fn submit_click(&mut self, x: u32, y: u32, now: Instant) -> Result<(), QueryError> {
        self.tracker.submit(x, y, now)
    }

    /// Run one tick over a frame
    pub fn tick(&mut self, frame: &DepthFrame, now: Instant) -> TickOutput {
        let classification = classifier::classify(frame, &self.ladder);
        let alert = alarm::maybe_alert(classification.closest_m, now, &self.ladder, &mut self.alarm);
        let resolved = self.tracker.tick(frame, now);

        TickOutput {
            classification,
            alert,
            display: resolved.display,
            records: resolved.records,
        }
    }

    pub fn ladder(&self) -> &ZoneLadder {
        &self.ladder
    }

    /// Number of live point queries
    pub fn pending_queries(&self) -> usize {
        self.tracker.len()
    }
}

/// Summary of a finished session
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionSummary {
    pub ticks: u64,
    pub skipped_ticks: u64,
    pub alerts: u64,
    pub records_written: u64,
}

/// Run the tick loop until the stop signal, a tick budget, or a fatal
/// sensor error.
///
/// Transient frame gaps skip the tick and retry; storage write failures
/// are logged and the session continues. On every exit path, fatal or not,
/// the sensor session is closed and the distance log flushed before
/// returning.
#[allow(clippy::too_many_arguments)]
pub fn run_session(
    session: &mut dyn DepthSession,
    engine: &mut Engine,
    clicks: &mut ClickReceiver,
    log: &mut DistanceLog,
    alert_sink: &mut dyn AlertSink,
    stop: &Arc<AtomicBool>,
    max_ticks: Option<u64>,
    mut on_tick: impl FnMut(&TickOutput),
) -> Result<SessionSummary, EngineError> {
    let mut summary = SessionSummary::default();

    let result = session_loop(
        session,
        engine,
        clicks,
        log,
        alert_sink,
        stop,
        max_ticks,
        &mut on_tick,
        &mut summary,
    );

    // Cleanup on every path: release the sensor, flush the log
    if let Err(e) = session.close() {
        warn!(error = %e, "Failed to close sensor session");
    }
    if let Err(e) = log.flush() {
        warn!(error = %e, "Failed to flush distance log");
    }

    info!(
        ticks = summary.ticks,
        skipped = summary.skipped_ticks,
        alerts = summary.alerts,
        records = summary.records_written,
        "Session finished"
    );

    result.map(|_| summary)
}

#[allow(clippy::too_many_arguments)]
fn session_loop(
    session: &mut dyn DepthSession,
    engine: &mut Engine,
    clicks: &mut ClickReceiver,
    log: &mut DistanceLog,
    alert_sink: &mut dyn AlertSink,
    stop: &Arc<AtomicBool>,
    max_ticks: Option<u64>,
    on_tick: &mut impl FnMut(&TickOutput),
    summary: &mut SessionSummary,
) -> Result<(), EngineError> {
    while !stop.load(Ordering::SeqCst) {
        if let Some(limit) = max_ticks
            && summary.ticks >= limit
        {
            debug!(limit, "Tick budget reached");
            break;
        }

        let frame = match session.wait_next_frame() {
            Ok(frame) => frame,
            Err(SensorError::FrameTimeout) => {
                // Transient gap: skip the tick, retry next iteration
                summary.skipped_ticks += 1;
                debug!("No frame this period, skipping tick");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let now = Instant::now();

        // Drain clicks at one fixed point per tick, never mid-classification
        for click in clicks.drain() {
            if let Err(e) = engine.submit_click(click.x, click.y, click.at) {
                warn!(error = %e, "Dropping out-of-range query");
            }
        }

        let output = engine.tick(&frame, now);

        if let Some(alert) = &output.alert {
            summary.alerts += 1;
            alert_sink.fire(alert);
        }

        for record in &output.records {
            info!(
                x = record.x,
                y = record.y,
                distance_m = format!("{:.2}", record.distance_m),
                "Distance at queried point"
            );
            // Recoverable: a logging failure must not kill the session
            match log.append(record) {
                Ok(()) => summary.records_written += 1,
                Err(e) => warn!(error = %e, "Failed to persist distance record"),
            }
        }

        on_tick(&output);
        summary.ticks += 1;
    }

    Ok(())
}

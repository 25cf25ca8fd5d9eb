// SPDX-License-Identifier: GPL-3.0-only

//! Click/tap event handoff
//!
//! The operator can click between or during ticks, so submissions cross a
//! bounded single-producer/single-consumer channel. The tick loop drains
//! the queue fully at one fixed point per tick, never mid-classification.

use futures::channel::mpsc;
use std::time::Instant;
use tracing::debug;

/// One raw click/tap at frame coordinates
#[derive(Debug, Clone, Copy)]
pub struct ClickEvent {
    pub x: u32,
    pub y: u32,
    /// Wall-clock submission time; the query TTL counts from here
    pub at: Instant,
}

/// Producer side, held by the input collaborator
#[derive(Debug, Clone)]
pub struct ClickSender {
    tx: mpsc::Sender<ClickEvent>,
}

/// Consumer side, drained by the tick loop
#[derive(Debug)]
pub struct ClickReceiver {
    rx: mpsc::Receiver<ClickEvent>,
}

/// Create a bounded click channel
pub fn click_channel(capacity: usize) -> (ClickSender, ClickReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (ClickSender { tx }, ClickReceiver { rx })
}

impl ClickSender {
    /// Submit a click at `(x, y)`, non-blocking.
    ///
    /// If the queue is full the click is dropped with a debug log; a human
    /// clicking faster than the tick loop drains is not an error.
    pub fn submit(&mut self, x: u32, y: u32) {
        let event = ClickEvent {
            x,
            y,
            at: Instant::now(),
        };
        if let Err(e) = self.tx.try_send(event) {
            debug!(x, y, error = ?e, "Click dropped (queue full or closed)");
        }
    }
}

impl ClickReceiver {
    /// Drain every pending click, in submission order
    pub fn drain(&mut self) -> Vec<ClickEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.rx.try_next() {
            events.push(event);
        }
        events
    }
}

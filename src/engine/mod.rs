// SPDX-License-Identifier: GPL-3.0-only

//! Proximity alert & query engine core
//!
//! - [`ladder`]: the ordered distance threshold ladder
//! - [`classifier`]: per-frame zone classification and closest-distance reduction
//! - [`alarm`]: the debounced per-zone alarm state machine
//! - [`query`]: the TTL-bounded point-query tracker
//! - [`orchestrator`]: the per-tick pipeline and session loop

pub mod alarm;
pub mod classifier;
pub mod ladder;
pub mod orchestrator;
pub mod query;

pub use alarm::{AlarmState, AlertEvent};
pub use classifier::{ClassificationResult, classify};
pub use ladder::ZoneLadder;
pub use orchestrator::{Engine, SessionSummary, TickOutput, run_session};
pub use query::{DisplayItem, PersistedRecord, QueryPolicy, QueryTracker};

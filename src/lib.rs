// SPDX-License-Identifier: GPL-3.0-only

//! Depth Sentinel - a proximity alert and distance query engine
//!
//! This library turns a stream of depth frames into tiered proximity
//! alerts and on-demand point distance queries, persisting every resolved
//! query to a CSV session log.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`backends`]: Depth sensor sessions, click input, and alert sinks
//! - [`engine`]: Zone classification, debounced alarms, query tracking,
//!   and the per-frame tick orchestrator
//! - [`render`]: Zone overlay composition and PNG snapshots
//! - [`config`]: User configuration handling
//! - [`storage`]: CSV distance log persistence

pub mod backends;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod render;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use backends::sensor::{DepthFrame, DepthSession, SessionConfig};
pub use config::Config;
pub use constants::LadderPreset;
pub use engine::{AlertEvent, Engine, SessionSummary, ZoneLadder, run_session};
pub use errors::{EngineError, EngineResult, SensorError};

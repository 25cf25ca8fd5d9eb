// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the proximity alerting engine

use std::fmt;

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Top-level engine error type
#[derive(Debug, Clone)]
pub enum EngineError {
    /// Sensor session errors
    Sensor(SensorError),
    /// Distance log / filesystem errors
    Storage(StorageError),
    /// Query submission errors
    Query(QueryError),
    /// Configuration errors (ladder validation, config file parsing)
    Config(String),
    /// Overlay / snapshot rendering errors
    Render(String),
    /// Generic error with message
    Other(String),
}

/// Sensor-specific errors
#[derive(Debug, Clone)]
pub enum SensorError {
    /// No depth sensor available
    NotFound,
    /// Sensor session could not be opened
    InitializationFailed(String),
    /// Sensor lost mid-run; terminates the session
    Disconnected,
    /// A frame wait elapsed without data; the tick is skipped and the
    /// loop retries on the next iteration
    FrameTimeout,
    /// Backend error (device, file playback, ...)
    Backend(String),
}

/// Distance log errors. Write failures are recoverable: the session
/// logs them and continues.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Failed to create the log file
    Create(String),
    /// Failed to append or flush a record
    Write(String),
}

/// Point-query submission errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Coordinate lies outside the frame bounds; rejected at submission
    OutOfRange { x: u32, y: u32 },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Sensor(e) => write!(f, "Sensor error: {}", e),
            EngineError::Storage(e) => write!(f, "Storage error: {}", e),
            EngineError::Query(e) => write!(f, "Query error: {}", e),
            EngineError::Config(msg) => write!(f, "Configuration error: {}", msg),
            EngineError::Render(msg) => write!(f, "Render error: {}", msg),
            EngineError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::NotFound => write!(f, "No depth sensor found"),
            SensorError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            SensorError::Disconnected => write!(f, "Sensor disconnected"),
            SensorError::FrameTimeout => write!(f, "Timed out waiting for frame"),
            SensorError::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Create(msg) => write!(f, "Failed to create distance log: {}", msg),
            StorageError::Write(msg) => write!(f, "Failed to write record: {}", msg),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::OutOfRange { x, y } => {
                write!(f, "Query coordinate ({}, {}) is outside frame bounds", x, y)
            }
        }
    }
}

impl std::error::Error for EngineError {}
impl std::error::Error for SensorError {}
impl std::error::Error for StorageError {}
impl std::error::Error for QueryError {}

// Conversions from sub-errors to EngineError
impl From<SensorError> for EngineError {
    fn from(err: SensorError) -> Self {
        EngineError::Sensor(err)
    }
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        EngineError::Storage(err)
    }
}

impl From<QueryError> for EngineError {
    fn from(err: QueryError) -> Self {
        EngineError::Query(err)
    }
}

impl From<String> for EngineError {
    fn from(msg: String) -> Self {
        EngineError::Other(msg)
    }
}

impl From<&str> for EngineError {
    fn from(msg: &str) -> Self {
        EngineError::Other(msg.to_string())
    }
}

// Conversions for I/O errors
impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Write(err.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Storage(StorageError::Write(err.to_string()))
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Append-only distance log
//!
//! One CSV row per resolved point query, written and flushed incrementally
//! as the session runs so that a crash preserves prior rows. Write failures
//! are recoverable: the orchestrator logs them and keeps the session alive.

use crate::engine::query::PersistedRecord;
use crate::errors::StorageError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Incremental CSV writer for resolved queries
#[derive(Debug)]
pub struct DistanceLog {
    path: PathBuf,
    writer: BufWriter<File>,
    rows: u64,
}

impl DistanceLog {
    /// Create the log (truncating any previous file) and write the header
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Create(format!("{}: {}", parent.display(), e)))?;
        }
        let file = File::create(path)
            .map_err(|e| StorageError::Create(format!("{}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", crate::constants::CSV_HEADER).map_err(StorageError::from)?;
        writer.flush().map_err(StorageError::from)?;

        info!(path = %path.display(), "Distance log created");
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        })
    }

    /// Append one record and flush it to disk
    pub fn append(&mut self, record: &PersistedRecord) -> Result<(), StorageError> {
        writeln!(
            self.writer,
            "{},{},{:.2}",
            record.x, record.y, record.distance_m
        )?;
        self.writer.flush()?;
        self.rows += 1;
        debug!(
            x = record.x,
            y = record.y,
            distance_m = format!("{:.2}", record.distance_m),
            "Distance record written"
        );
        Ok(())
    }

    /// Rows written so far (excluding the header)
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Log file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush any buffered output
    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.writer.flush().map_err(StorageError::from)
    }
}

impl Drop for DistanceLog {
    fn drop(&mut self) {
        // Best-effort flush; errors here have nowhere to go
        let _ = self.writer.flush();
    }
}

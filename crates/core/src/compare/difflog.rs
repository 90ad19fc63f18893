//! File-append difference logger.
//!
//! Each difference is written as one JSON line, so runs over the same
//! log file accumulate and the result stays greppable and parseable.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which side of a comparison a record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Lhs,
    Rhs,
}

/// The observed difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffKind {
    /// First offset at which the decoded bytes disagree.
    ByteMismatch { offset: usize, lhs: u8, rhs: u8 },
    /// Decoded lengths disagree (reported after any byte mismatch in
    /// the common prefix).
    LengthMismatch { lhs_len: usize, rhs_len: usize },
    /// One side failed to decode.
    DecodeFailure { side: Side, message: String },
}

/// One logged difference, tagged with the job that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub label: String,
    #[serde(flatten)]
    pub kind: DiffKind,
}

impl DiffRecord {
    pub fn new(label: impl Into<String>, kind: DiffKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

/// Append-mode JSON-lines difference log.
pub struct DiffLog {
    writer: BufWriter<File>,
}

impl DiffLog {
    /// Open `path` for appending, creating it if missing.
    pub fn append_to(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Write one record as a JSON line.
    pub fn log(&mut self, record: &DiffRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    /// Flush buffered lines to the file.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for DiffLog {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

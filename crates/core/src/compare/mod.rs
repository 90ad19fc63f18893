//! Stream comparison pipeline: job queue, worker pool, difference log.

pub mod difflog;
pub mod engine;
pub mod queue;

pub use difflog::{DiffKind, DiffLog, DiffRecord, Side};
pub use engine::{CompareJob, CompareSummary, compare_bytes, compare_streams, run_jobs};
pub use queue::BoundedQueue;

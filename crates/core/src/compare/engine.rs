//! Comparison engine: decodes stream pairs and reports differences.
//!
//! Jobs flow through a bounded queue to a pool of worker threads;
//! each worker owns its jobs' decoder state exclusively, and records
//! travel back over a channel to the caller's thread, which appends
//! them to the difference log.

use std::sync::mpsc;
use std::thread;

use tracing::debug;

use crate::compare::difflog::{DiffKind, DiffLog, DiffRecord, Side};
use crate::compare::queue::BoundedQueue;
use crate::error::Result;
use crate::model::objects::PDFStream;

/// In-flight jobs held by the queue at any moment.
const QUEUE_CAPACITY: usize = 32;

/// One comparison unit: two streams expected to decode identically.
#[derive(Debug, Clone)]
pub struct CompareJob {
    pub label: String,
    pub lhs: PDFStream,
    pub rhs: PDFStream,
}

impl CompareJob {
    pub fn new(label: impl Into<String>, lhs: PDFStream, rhs: PDFStream) -> Self {
        Self {
            label: label.into(),
            lhs,
            rhs,
        }
    }
}

/// Aggregate outcome of a comparison run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CompareSummary {
    /// Jobs executed.
    pub jobs: usize,
    /// Jobs whose decoded bytes differed.
    pub differing: usize,
    /// Jobs with at least one decode failure.
    pub failures: usize,
}

/// Compare two decoded byte sequences.
///
/// Produces at most one byte-mismatch record (the first differing
/// offset in the common prefix) and one length-mismatch record; an
/// empty result means the sequences are identical.
pub fn compare_bytes(label: &str, lhs: &[u8], rhs: &[u8]) -> Vec<DiffRecord> {
    let mut records = Vec::new();
    if let Some(offset) = lhs.iter().zip(rhs).position(|(l, r)| l != r) {
        records.push(DiffRecord::new(
            label,
            DiffKind::ByteMismatch {
                offset,
                lhs: lhs[offset],
                rhs: rhs[offset],
            },
        ));
    }
    if lhs.len() != rhs.len() {
        records.push(DiffRecord::new(
            label,
            DiffKind::LengthMismatch {
                lhs_len: lhs.len(),
                rhs_len: rhs.len(),
            },
        ));
    }
    records
}

/// Decode both sides of a job and compare the results.
///
/// A side that fails to decode yields a decode-failure record instead
/// of aborting the run; the error text is preserved in the record.
pub fn compare_streams(label: &str, lhs: &mut PDFStream, rhs: &mut PDFStream) -> Vec<DiffRecord> {
    match (lhs.get_data(), rhs.get_data()) {
        (Ok(l), Ok(r)) => compare_bytes(label, l, r),
        (lhs_res, rhs_res) => {
            let mut records = Vec::new();
            for (side, res) in [(Side::Lhs, lhs_res), (Side::Rhs, rhs_res)] {
                if let Err(e) = res {
                    records.push(DiffRecord::new(
                        label,
                        DiffKind::DecodeFailure {
                            side,
                            message: e.to_string(),
                        },
                    ));
                }
            }
            records
        }
    }
}

/// Run `jobs` across `workers` threads, appending every difference
/// record to `log`.
///
/// Records are written on the caller's thread once all workers have
/// finished; the log ends up fully flushed.
pub fn run_jobs(jobs: Vec<CompareJob>, workers: usize, log: &mut DiffLog) -> Result<CompareSummary> {
    let workers = workers.max(1);
    let total = jobs.len();
    debug!(jobs = total, workers, "starting comparison run");

    let queue: BoundedQueue<CompareJob> = BoundedQueue::with_capacity(QUEUE_CAPACITY);
    let (tx, rx) = mpsc::channel::<Vec<DiffRecord>>();

    thread::scope(|scope| -> Result<()> {
        let queue = &queue;
        for _ in 0..workers {
            let tx = tx.clone();
            scope.spawn(move || {
                while let Some(mut job) = queue.pop() {
                    debug!(label = %job.label, "comparing streams");
                    let records = compare_streams(&job.label, &mut job.lhs, &mut job.rhs);
                    if tx.send(records).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);
        let pushed: Result<()> = jobs.into_iter().try_for_each(|job| queue.push(job));
        // Close before propagating so blocked workers always wake.
        queue.close();
        pushed
    })?;

    let mut summary = CompareSummary {
        jobs: total,
        ..CompareSummary::default()
    };
    for records in rx {
        let mut differed = false;
        let mut failed = false;
        for record in &records {
            match record.kind {
                DiffKind::DecodeFailure { .. } => failed = true,
                _ => differed = true,
            }
            log.log(record)?;
        }
        if differed {
            summary.differing += 1;
        }
        if failed {
            summary.failures += 1;
        }
    }
    log.flush()?;
    debug!(?summary, "comparison run finished");
    Ok(summary)
}

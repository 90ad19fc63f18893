//! Comparison engine tests: byte diffs, decode failures, worker runs.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use pdfdelta_core::compare::{
    CompareJob, DiffKind, DiffLog, Side, compare_bytes, compare_streams, run_jobs,
};
use pdfdelta_core::pdftypes::{PDFObject, PDFStream};

fn temp_log(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("pdfdelta-{}-{name}.jsonl", std::process::id()));
    let _ = fs::remove_file(&path);
    path
}

fn plain_stream(data: &[u8]) -> PDFStream {
    PDFStream::new(HashMap::new(), data.to_vec())
}

fn lzw_stream(raw: Vec<u8>) -> PDFStream {
    let attrs = HashMap::from([(
        "Filter".to_string(),
        PDFObject::Name("LZWDecode".into()),
    )]);
    PDFStream::new(attrs, raw)
}

#[test]
fn identical_bytes_produce_no_records() {
    assert!(compare_bytes("same", b"abc", b"abc").is_empty());
}

#[test]
fn first_mismatch_and_length_are_reported() {
    let records = compare_bytes("job", b"abcdef", b"abXdefgh");
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].kind,
        DiffKind::ByteMismatch {
            offset: 2,
            lhs: b'c',
            rhs: b'X'
        }
    );
    assert_eq!(
        records[1].kind,
        DiffKind::LengthMismatch {
            lhs_len: 6,
            rhs_len: 8
        }
    );
}

#[test]
fn decode_failure_becomes_a_record() {
    // codes [65, 66, 300]: corrupt on the right-hand side
    let mut lhs = plain_stream(b"AB");
    let mut rhs = lzw_stream(hex::decode("2090a59010").unwrap());
    let records = compare_streams("bad rhs", &mut lhs, &mut rhs);
    assert_eq!(records.len(), 1);
    assert!(matches!(
        &records[0].kind,
        DiffKind::DecodeFailure { side: Side::Rhs, message } if message.contains("corrupt")
    ));
}

#[test]
fn matching_lzw_streams_compare_equal_to_plain_bytes() {
    // pdfminer.six vector: decodes to "-----A---B"
    let mut lhs = lzw_stream(hex::decode("800b6050220c0c8501").unwrap());
    let mut rhs = plain_stream(b"-----A---B");
    assert!(compare_streams("vector", &mut lhs, &mut rhs).is_empty());
}

#[test]
fn run_jobs_logs_differences_and_summarizes() {
    let path = temp_log("run");
    let jobs = vec![
        CompareJob::new("equal", plain_stream(b"same"), plain_stream(b"same")),
        CompareJob::new("diff", plain_stream(b"aaaa"), plain_stream(b"aaab")),
        CompareJob::new(
            "fail",
            plain_stream(b""),
            lzw_stream(hex::decode("2090a59010").unwrap()),
        ),
    ];
    let mut log = DiffLog::append_to(&path).unwrap();
    let summary = run_jobs(jobs, 3, &mut log).unwrap();
    assert_eq!(summary.jobs, 3);
    assert_eq!(summary.differing, 1);
    assert_eq!(summary.failures, 1);

    let lines = fs::read_to_string(&path).unwrap();
    let labels: Vec<String> = lines
        .lines()
        .map(|line| {
            serde_json::from_str::<serde_json::Value>(line).unwrap()["label"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(labels.len(), 2);
    assert!(labels.contains(&"diff".to_string()));
    assert!(labels.contains(&"fail".to_string()));
    let _ = fs::remove_file(&path);
}

#[test]
fn run_jobs_with_more_jobs_than_queue_capacity() {
    let path = temp_log("many");
    let jobs: Vec<CompareJob> = (0..100)
        .map(|i| {
            CompareJob::new(
                format!("job {i}"),
                plain_stream(b"payload"),
                plain_stream(b"payload"),
            )
        })
        .collect();
    let mut log = DiffLog::append_to(&path).unwrap();
    let summary = run_jobs(jobs, 4, &mut log).unwrap();
    assert_eq!(summary.jobs, 100);
    assert_eq!(summary.differing, 0);
    assert_eq!(summary.failures, 0);
    let _ = fs::remove_file(&path);
}

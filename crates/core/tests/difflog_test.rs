//! Difference log tests: JSON-lines format and append behavior.

use std::fs;
use std::path::PathBuf;

use pdfdelta_core::compare::{DiffKind, DiffLog, DiffRecord, Side};

fn temp_log(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("pdfdelta-{}-{name}.jsonl", std::process::id()));
    let _ = fs::remove_file(&path);
    path
}

fn read_records(path: &PathBuf) -> Vec<DiffRecord> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn records_round_trip_as_json_lines() {
    let path = temp_log("roundtrip");
    let records = [
        DiffRecord::new(
            "page 1",
            DiffKind::ByteMismatch {
                offset: 17,
                lhs: 0x41,
                rhs: 0x42,
            },
        ),
        DiffRecord::new(
            "page 1",
            DiffKind::LengthMismatch {
                lhs_len: 100,
                rhs_len: 90,
            },
        ),
        DiffRecord::new(
            "page 2",
            DiffKind::DecodeFailure {
                side: Side::Rhs,
                message: "corrupt LZW stream".to_string(),
            },
        ),
    ];
    {
        let mut log = DiffLog::append_to(&path).unwrap();
        for record in &records {
            log.log(record).unwrap();
        }
        log.flush().unwrap();
    }
    assert_eq!(read_records(&path), records);
    let _ = fs::remove_file(&path);
}

#[test]
fn reopening_appends_instead_of_truncating() {
    let path = temp_log("append");
    let record = DiffRecord::new(
        "run",
        DiffKind::LengthMismatch {
            lhs_len: 1,
            rhs_len: 2,
        },
    );
    for _ in 0..2 {
        let mut log = DiffLog::append_to(&path).unwrap();
        log.log(&record).unwrap();
        // Dropping the log flushes it.
    }
    assert_eq!(read_records(&path).len(), 2);
    let _ = fs::remove_file(&path);
}

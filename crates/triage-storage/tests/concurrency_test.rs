//! Concurrent ingest: no double creation, no lost increments.

use std::sync::Arc;
use std::thread;

use triage_core::models::ErrorReport;
use triage_core::traits::IErrorGroupStorage;
use triage_storage::StorageEngine;

fn literal_report(i: usize) -> ErrorReport {
    ErrorReport::new("p1", "py", "ValueError", format!("invalid literal '{i}'"), i as f64)
}

fn typed_report(t: u8) -> ErrorReport {
    let error_type = format!("Error{}", char::from(b'A' + t));
    ErrorReport::new("p1", "py", error_type, "boom", 1.0)
}

#[test]
fn fifty_concurrent_ingests_yield_one_group_with_count_fifty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(StorageEngine::open(&dir.path().join("triage.db")).unwrap());

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let storage = Arc::clone(&storage);
            thread::spawn(move || storage.ingest(&literal_report(i)).unwrap())
        })
        .collect();
    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let created = outcomes.iter().filter(|o| o.created).count();
    assert_eq!(created, 1, "exactly one ingest creates the group");

    let group = storage
        .get_by_fingerprint(&outcomes[0].fingerprint)
        .unwrap()
        .unwrap();
    assert_eq!(group.count, 50);
    assert_eq!(storage.count_groups("p1").unwrap(), 1);

    let mut counts: Vec<u64> = outcomes.iter().map(|o| o.count).collect();
    counts.sort_unstable();
    assert_eq!(counts, (1..=50).collect::<Vec<u64>>(), "every ingest sees its own increment");
}

#[test]
fn two_engines_on_one_file_share_the_counter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");
    let first = Arc::new(StorageEngine::open(&path).unwrap());
    let second = Arc::new(StorageEngine::open(&path).unwrap());

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let storage = if i % 2 == 0 {
                Arc::clone(&first)
            } else {
                Arc::clone(&second)
            };
            thread::spawn(move || storage.ingest(&literal_report(i)).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let fingerprint = literal_report(0).fingerprint();
    let from_first = first.get_by_fingerprint(&fingerprint).unwrap().unwrap();
    let from_second = second.get_by_fingerprint(&fingerprint).unwrap().unwrap();
    assert_eq!(from_first.count, 40);
    assert_eq!(from_first.id, from_second.id);
    assert_eq!(first.count_groups("p1").unwrap(), 1);
}

#[test]
fn distinct_fingerprints_ingest_independently() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(StorageEngine::open(&dir.path().join("triage.db")).unwrap());

    let handles: Vec<_> = (0..8u8)
        .map(|t| {
            let storage = Arc::clone(&storage);
            thread::spawn(move || {
                for _ in 0..10 {
                    storage.ingest(&typed_report(t)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(storage.count_groups("p1").unwrap(), 8);
    for t in 0..8u8 {
        let fingerprint = typed_report(t).fingerprint();
        let group = storage.get_by_fingerprint(&fingerprint).unwrap().unwrap();
        assert_eq!(group.count, 10);
    }
}

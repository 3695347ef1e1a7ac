//! View listing and keyword search.

use std::collections::HashSet;

use triage_core::models::{ErrorGroup, ErrorReport, UserRef, View};
use triage_core::traits::IErrorGroupStorage;
use triage_storage::StorageEngine;

fn ids(groups: &[ErrorGroup]) -> Vec<String> {
    groups.iter().map(|g| g.id.clone()).collect()
}

fn id_set(groups: &[ErrorGroup]) -> HashSet<String> {
    groups.iter().map(|g| g.id.clone()).collect()
}

fn ingest(storage: &StorageEngine, error_type: &str, message: &str, ts: f64) -> String {
    storage
        .ingest(&ErrorReport::new("p1", "py", error_type, message, ts))
        .unwrap()
        .group_id
}

/// Five groups: plain, seen by alice, hidden, claimed by alice, claimed by bob.
fn populated() -> (StorageEngine, Vec<String>) {
    let storage = StorageEngine::open_in_memory().unwrap();
    let alice = UserRef::from("alice");
    let bob = UserRef::from("bob");
    let ids: Vec<String> = (0..5)
        .map(|i| ingest(&storage, &format!("Error{i}"), "boom", f64::from(i)))
        .collect();
    storage.mark_seen("p1", &ids[1], &alice).unwrap();
    storage.hide("p1", &ids[2], &bob).unwrap();
    storage.claim("p1", &ids[3], &alice).unwrap();
    storage.claim("p1", &ids[4], &bob).unwrap();
    storage
        .ingest(&ErrorReport::new("p2", "py", "Error0", "boom", 9.0))
        .unwrap();
    (storage, ids)
}

#[test]
fn views_select_expected_groups() {
    let (storage, ids) = populated();
    let alice = UserRef::from("alice");
    let list = |view| id_set(&storage.list("p1", view, &alice).unwrap());
    let set = |idx: &[usize]| idx.iter().map(|&i| ids[i].clone()).collect::<HashSet<_>>();

    assert_eq!(list(View::Active), set(&[0, 1, 3, 4]));
    assert_eq!(list(View::Hidden), set(&[2]));
    assert_eq!(list(View::Seen), set(&[1]));
    assert_eq!(list(View::Unseen), set(&[0, 3, 4]));
    assert_eq!(list(View::Mine), set(&[3]));
    assert_eq!(list(View::Unclaimed), set(&[0, 1]));
}

#[test]
fn active_and_hidden_partition_the_project() {
    let (storage, _) = populated();
    for viewer in ["alice", "bob", "carol"] {
        let viewer = UserRef::from(viewer);
        let active = id_set(&storage.list("p1", View::Active, &viewer).unwrap());
        let hidden = id_set(&storage.list("p1", View::Hidden, &viewer).unwrap());
        let seen = id_set(&storage.list("p1", View::Seen, &viewer).unwrap());
        let unseen = id_set(&storage.list("p1", View::Unseen, &viewer).unwrap());

        assert!(active.is_disjoint(&hidden));
        assert_eq!(active.len() + hidden.len(), storage.count_groups("p1").unwrap());
        assert!(seen.is_disjoint(&unseen));
        assert_eq!(&seen | &unseen, active);
    }
}

#[test]
fn views_order_by_last_seen_descending() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let old = ingest(&storage, "Old", "boom", 1.0);
    let new = ingest(&storage, "New", "boom", 5.0);
    let mid = ingest(&storage, "Mid", "boom", 3.0);
    let viewer = UserRef::from("alice");

    assert_eq!(
        ids(&storage.list("p1", View::Active, &viewer).unwrap()),
        vec![new.clone(), mid.clone(), old.clone()]
    );

    ingest(&storage, "Old", "boom", 10.0);
    assert_eq!(
        ids(&storage.list("p1", View::Active, &viewer).unwrap()),
        vec![old, new, mid]
    );
}

#[test]
fn search_terms_are_ored() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let io = ingest(&storage, "IOError", "read failed", 1.0);
    ingest(&storage, "KeyError", "missing", 2.0);
    storage.tag("p1", &io, "timeout").unwrap();

    let hits = storage.search("p1", "network timeout").unwrap();
    assert_eq!(ids(&hits), vec![io]);
}

#[test]
fn search_type_and_tag_match_substrings_case_insensitively() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let value = ingest(&storage, "ValueError", "x", 1.0);
    let key = ingest(&storage, "KeyError", "y", 2.0);
    storage.tag("p1", &key, "Database").unwrap();

    assert_eq!(id_set(&storage.search("p1", "valueerr").unwrap()), [value.clone()].into());
    assert_eq!(id_set(&storage.search("p1", "DATA").unwrap()), [key.clone()].into());
    assert_eq!(id_set(&storage.search("p1", "error").unwrap()), [value, key].into());
}

#[test]
fn search_keywords_match_whole_tokens_only() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let id = ingest(&storage, "RuntimeError", "Connection refused by upstream", 1.0);

    assert_eq!(ids(&storage.search("p1", "REFUSED").unwrap()), vec![id]);
    assert!(storage.search("p1", "refuse").unwrap().is_empty());
}

#[test]
fn search_includes_hidden_and_stays_in_project() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let id = ingest(&storage, "IOError", "disk", 1.0);
    storage.hide("p1", &id, &UserRef::from("alice")).unwrap();
    storage
        .ingest(&ErrorReport::new("p2", "py", "IOError", "disk", 1.0))
        .unwrap();

    assert_eq!(ids(&storage.search("p1", "ioerror").unwrap()), vec![id]);
}

#[test]
fn blank_search_returns_every_group() {
    let storage = StorageEngine::open_in_memory().unwrap();
    ingest(&storage, "A", "x", 1.0);
    ingest(&storage, "B", "y", 2.0);
    assert_eq!(storage.search("p1", "   ").unwrap().len(), 2);
}

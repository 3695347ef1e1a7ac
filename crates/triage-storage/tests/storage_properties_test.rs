//! Property tests: count equals ingests, tag counter equals attachments,
//! round trip of the latest snapshot.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use triage_core::models::ErrorReport;
use triage_core::traits::{IErrorGroupStorage, ITagCatalog};
use triage_storage::StorageEngine;

const TYPES: [&str; 3] = ["ValueError", "KeyError", "IOError"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn group_count_matches_ingests(
        picks in prop::collection::vec((0usize..3, 0u32..1000), 1..40),
    ) {
        let storage = StorageEngine::open_in_memory().unwrap();
        let mut expected: BTreeMap<usize, u64> = BTreeMap::new();
        for (i, &(kind, n)) in picks.iter().enumerate() {
            let message = format!("failed at {n}");
            let report = ErrorReport::new("p1", "py", TYPES[kind], message, i as f64);
            storage.ingest(&report).unwrap();
            *expected.entry(kind).or_default() += 1;
        }

        prop_assert_eq!(storage.count_groups("p1").unwrap(), expected.len());
        for (kind, count) in expected {
            let fingerprint =
                ErrorReport::new("p1", "py", TYPES[kind], "failed at 0", 0.0).fingerprint();
            let group = storage.get_by_fingerprint(&fingerprint).unwrap().unwrap();
            prop_assert_eq!(group.count, count);
        }
    }

    #[test]
    fn tag_counter_equals_groups_carrying_tag(
        ops in prop::collection::vec((0usize..3, any::<bool>()), 0..30),
    ) {
        let storage = StorageEngine::open_in_memory().unwrap();
        let ids: Vec<String> = TYPES
            .iter()
            .map(|t| storage.ingest(&ErrorReport::new("p1", "py", *t, "m", 1.0)).unwrap().group_id)
            .collect();

        let mut carrying = BTreeSet::new();
        for (idx, attach) in ops {
            if attach {
                storage.tag("p1", &ids[idx], "flaky").unwrap();
                carrying.insert(idx);
            } else {
                storage.untag("p1", &ids[idx], "flaky").unwrap();
                carrying.remove(&idx);
            }
        }

        let count = storage.get_tag("flaky").unwrap().map_or(0, |t| t.count);
        prop_assert_eq!(count, carrying.len() as u64);
    }

    #[test]
    fn latest_snapshot_round_trips(
        line in 0i64..10_000,
        file in "[a-z]{1,8}\\.py",
        ts in 0.0f64..1e9,
    ) {
        let storage = StorageEngine::open_in_memory().unwrap();
        storage.ingest(&ErrorReport::new("p1", "py", "E", "first", 0.0)).unwrap();
        let latest =
            ErrorReport::new("p1", "py", "E", "first", ts).with_location(file.clone(), line);
        let outcome = storage.ingest(&latest).unwrap();

        let group = storage.get_by_fingerprint(&outcome.fingerprint).unwrap().unwrap();
        prop_assert_eq!(group.file, Some(file));
        prop_assert_eq!(group.line, Some(line));
        prop_assert_eq!(group.last_seen, ts);
        prop_assert_eq!(group.first_seen, 0.0);
        prop_assert_eq!(group.count, 2);
    }
}

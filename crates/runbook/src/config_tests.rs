// SPDX-License-Identifier: MIT

use super::*;
use bos_core::test_support::sample_journey;

fn store() -> (tempfile::TempDir, ConfigStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ConfigStore::open(dir.path());
    (dir, store)
}

#[test]
fn save_then_load_round_trips() {
    let (_dir, store) = store();
    let journey = sample_journey("Acme");
    let config = SavedJourneyConfig::from_journey_spec("cfg-1", "Acme checkout", &journey, 1_700_000_000_000);
    store.save(&config).expect("save");

    let loaded = store.load("cfg-1").expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn load_missing_returns_not_found() {
    let (_dir, store) = store();
    let err = store.load("missing").unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn delete_reports_whether_a_file_existed() {
    let (_dir, store) = store();
    let journey = sample_journey("Acme");
    let config = SavedJourneyConfig::from_journey_spec("cfg-1", "Acme checkout", &journey, 1);
    store.save(&config).expect("save");

    assert!(store.delete("cfg-1").expect("delete"));
    assert!(!store.delete("cfg-1").expect("delete again"));
}

#[test]
fn list_returns_all_saved_configs_sorted_by_id() {
    let (_dir, store) = store();
    let journey = sample_journey("Acme");
    for id in ["cfg-b", "cfg-a", "cfg-c"] {
        let config = SavedJourneyConfig::from_journey_spec(id, "name", &journey, 1);
        store.save(&config).expect("save");
    }

    let ids: Vec<_> = store.list().expect("list").into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["cfg-a", "cfg-b", "cfg-c"]);
}

#[test]
fn to_journey_spec_mints_a_fresh_journey_id() {
    let (_dir, store) = store();
    let journey = sample_journey("Acme");
    let config = SavedJourneyConfig::from_journey_spec("cfg-1", "name", &journey, 1);
    store.save(&config).expect("save");

    let loaded = store.load("cfg-1").expect("load");
    let replayed = loaded.to_journey_spec();
    assert_ne!(replayed.journey_id, journey.journey_id);
    assert_eq!(replayed.steps, journey.steps);
}

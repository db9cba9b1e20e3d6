use std::fs;

use alert_core::SeenSet;
use alert_engine::SeenStore;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn absent_file_loads_to_empty_set() {
    let temp = TempDir::new().unwrap();
    let store = SeenStore::new(temp.path().join("jobs_db.json"));
    let seen = store.load();
    assert!(seen.is_empty());
}

#[test]
fn corrupt_file_loads_to_empty_set() {
    alert_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jobs_db.json");
    fs::write(&path, "{not valid json").unwrap();

    let store = SeenStore::new(&path);
    let seen = store.load();
    assert!(seen.is_empty());
}

#[test]
fn save_then_load_round_trips_identifiers() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jobs_db.json");
    let store = SeenStore::new(&path);

    let seen = SeenSet::from_ids(["aaa".to_string(), "bbb".to_string()]);
    store.save(&seen).unwrap();

    let loaded = store.load();
    assert_eq!(loaded, seen);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("seen_job_ids"));
    assert!(content.contains("last_updated"));
    // Pretty-printed for hand inspection.
    assert!(content.contains('\n'));
}

#[test]
fn integer_identifiers_from_older_files_are_accepted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jobs_db.json");
    fs::write(
        &path,
        r#"{ "seen_job_ids": [1234567890, "abcdef"], "last_updated": "2026-01-01T00:00:00Z" }"#,
    )
    .unwrap();

    let store = SeenStore::new(&path);
    let seen = store.load();
    assert_eq!(seen.len(), 2);
    assert!(seen.contains("1234567890"));
    assert!(seen.contains("abcdef"));
}

#[test]
fn save_overwrites_previous_state_wholesale() {
    let temp = TempDir::new().unwrap();
    let store = SeenStore::new(temp.path().join("jobs_db.json"));

    store.save(&SeenSet::from_ids(["old".to_string()])).unwrap();
    store.save(&SeenSet::from_ids(["new".to_string()])).unwrap();

    let loaded = store.load();
    assert_eq!(loaded.len(), 1);
    assert!(loaded.contains("new"));
}

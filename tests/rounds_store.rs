use graphtune::rounds::{RoundStore, StoreError};
use serde_json::{Value, json};
use tempfile::TempDir;

fn store() -> (TempDir, RoundStore) {
    let dir = TempDir::new().unwrap();
    let store = RoundStore::new(dir.path());
    (dir, store)
}

#[test]
fn test_create_round_directory_is_idempotent() {
    let (_dir, store) = store();
    let first = store.create_round_directory(0).unwrap();
    let second = store.create_round_directory(0).unwrap();
    assert_eq!(first, second);
    assert!(first.ends_with("round_0"));
    assert!(first.is_dir());
}

#[test]
fn test_write_round_overwrites_and_reads_back_verbatim() {
    let (_dir, store) = store();
    store.create_round_directory(1).unwrap();
    store.write_round(1, "graph v1", "prompt v1").unwrap();
    store.write_round(1, "graph v2", "prompt v2").unwrap();

    let (graph, prompt) = store.read_round(1).unwrap();
    assert_eq!(graph, "graph v2");
    assert_eq!(prompt, "prompt v2");
}

#[test]
fn test_read_round_fails_not_found_when_either_file_missing() {
    let (dir, store) = store();
    assert!(matches!(
        store.read_round(9),
        Err(StoreError::NotFound { .. })
    ));

    // Graph present, prompt missing: still NotFound.
    store.create_round_directory(2).unwrap();
    std::fs::write(dir.path().join("round_2/graph.py"), "g").unwrap();
    assert!(matches!(
        store.read_round(2),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn test_experience_stub_matches_external_json_contract() {
    let (dir, store) = store();
    store.create_round_directory(3).unwrap();
    store
        .write_experience_stub(3, 0, "split the solver into plan and execute", 50.0)
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("round_3/experience.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        json!({
            "father node": 0,
            "modification": "split the solver into plan and execute",
            "before": 50.0,
            "after": null,
            "succeed": null,
        })
    );
}

#[test]
fn test_finalize_sets_strict_success_and_is_idempotent() {
    let (_dir, store) = store();
    store.create_round_directory(4).unwrap();
    store.write_experience_stub(4, 0, "m", 50.0).unwrap();

    let record = store.finalize_experience(4, 50.0).unwrap();
    assert_eq!(record.succeeded, Some(false)); // tie is not an improvement

    // Same score again: no drift.
    let again = store.finalize_experience(4, 50.0).unwrap();
    assert_eq!(again, record);

    let read_back = store.read_experience(4).unwrap();
    assert_eq!(read_back, record);
}

#[test]
fn test_finalize_without_stub_is_missing_stub() {
    let (_dir, store) = store();
    store.create_round_directory(5).unwrap();
    assert!(matches!(
        store.finalize_experience(5, 60.0),
        Err(StoreError::MissingStub { round: 5 })
    ));
}

#[test]
fn test_custom_file_names_are_honored() {
    let (dir, store) = store();
    let store = store
        .with_graph_file("graph.json")
        .with_prompt_file("prompt.txt");
    store.create_round_directory(0).unwrap();
    store.write_round(0, "{}", "prompt").unwrap();
    assert!(dir.path().join("round_0/graph.json").is_file());
    assert!(dir.path().join("round_0/prompt.txt").is_file());
    assert_eq!(store.read_round(0).unwrap().0, "{}");
}

//! Error handling and edge case tests.

use jsondb::{Query, RecordId, Store, StoreError};
use serde_json::{json, Value};
use tempfile::TempDir;

fn value_store(dir: &TempDir) -> Store<Value> {
    Store::open(dir.path().join("records.json")).unwrap()
}

fn fields(value: Value) -> Query {
    value.as_object().unwrap().clone()
}

fn file_content(store: &Store<Value>) -> String {
    std::fs::read_to_string(store.path()).unwrap()
}

// --- Duplicate ids ---

#[test]
fn test_add_duplicate_id_fails_and_leaves_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let store = value_store(&dir);

    store.add(json!({"id": 1, "title": "A"})).unwrap();
    let before = file_content(&store);

    let result = store.add(json!({"id": 1, "title": "B"}));
    let err = result.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(RecordId::Int(1))));
    assert!(err.to_string().contains("already exists"));

    assert_eq!(file_content(&store), before);
    assert_eq!(
        store.get_all().unwrap(),
        vec![json!({"id": 1, "title": "A"})]
    );
}

#[test]
fn test_add_many_rejects_existing_id() {
    let dir = TempDir::new().unwrap();
    let store = value_store(&dir);

    store.add(json!({"id": 2})).unwrap();
    let before = file_content(&store);

    let result = store.add_many(vec![json!({"id": 1}), json!({"id": 2})]);
    assert!(matches!(
        result,
        Err(StoreError::DuplicateId(RecordId::Int(2)))
    ));

    // The batch is all-or-nothing: id 1 must not have been appended either
    assert_eq!(file_content(&store), before);
}

#[test]
fn test_add_many_rejects_intra_batch_duplicates() {
    let dir = TempDir::new().unwrap();
    let store = value_store(&dir);

    let result = store.add_many(vec![
        json!({"id": 7, "title": "A"}),
        json!({"id": 7, "title": "B"}),
    ]);
    assert!(matches!(
        result,
        Err(StoreError::DuplicateId(RecordId::Int(7)))
    ));

    assert_eq!(store.get_all().unwrap(), Vec::<Value>::new());
}

// --- Missing records ---

#[test]
fn test_delete_unknown_id_fails_then_known_id_succeeds() {
    let dir = TempDir::new().unwrap();
    let store = value_store(&dir);

    store.add(json!({"id": 5})).unwrap();

    let err = store.delete_by_id(9).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(RecordId::Int(9))));
    assert!(err.to_string().contains("not found"));

    assert!(store.delete_by_id(5).unwrap());
    assert_eq!(store.get_all().unwrap(), Vec::<Value>::new());
}

#[test]
fn test_update_unknown_id_fails_and_leaves_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let store = value_store(&dir);

    store.add(json!({"id": 1, "a": 1})).unwrap();
    let before = file_content(&store);

    let result = store.update_by_id(2, &fields(json!({"a": 9})));
    assert!(matches!(
        result,
        Err(StoreError::NotFound(RecordId::Int(2)))
    ));
    assert_eq!(file_content(&store), before);
}

#[test]
fn test_update_with_no_matching_records() {
    let dir = TempDir::new().unwrap();
    let store = value_store(&dir);

    store.add(json!({"id": 1, "tag": "x"})).unwrap();
    let before = file_content(&store);

    let err = store
        .update(&fields(json!({"tag": "z"})), &fields(json!({"seen": true})))
        .unwrap_err();
    assert!(matches!(err, StoreError::NoMatch));
    assert_eq!(err.to_string(), "no matching records found");

    assert_eq!(file_content(&store), before);
}

// --- Invalid records ---

#[test]
fn test_record_without_id_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = value_store(&dir);

    let result = store.add(json!({"title": "A"}));
    assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
    assert_eq!(store.get_all().unwrap(), Vec::<Value>::new());
}

#[test]
fn test_non_object_record_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = value_store(&dir);

    let result = store.add(json!(42));
    assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
}

// --- Backing file problems ---

#[test]
fn test_corrupt_backing_file_surfaces_parse_error() {
    let dir = TempDir::new().unwrap();
    let store = value_store(&dir);

    std::fs::write(store.path(), "not json at all").unwrap();

    let result = store.get_all();
    assert!(matches!(result, Err(StoreError::Deserialization(_))));

    // No auto-repair: the content is left as it was
    assert_eq!(file_content(&store), "not json at all");
}

#[test]
fn test_non_array_backing_file_surfaces_parse_error() {
    let dir = TempDir::new().unwrap();
    let store = value_store(&dir);

    std::fs::write(store.path(), "{\"id\": 1}").unwrap();

    assert!(matches!(
        store.get_all(),
        Err(StoreError::Deserialization(_))
    ));
}

#[test]
fn test_missing_parent_directory_surfaces_io_error() {
    let dir = TempDir::new().unwrap();
    let store: Store<Value> =
        Store::open(dir.path().join("missing").join("records.json")).unwrap();

    assert!(matches!(store.get_all(), Err(StoreError::Io(_))));
}

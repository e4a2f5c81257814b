//! Error handling and edge case tests.

use std::fs;
use std::sync::Arc;
use student_records::{
    parse_birth_date, FileStorage, Gpa, KeyValueStorage, MemoryStorage, RecordStore, StoreError,
    Student, ValidationError, DEFAULT_STORAGE_KEY,
};
use tempfile::TempDir;

fn student(id: &str) -> Student {
    Student::new(
        id,
        "Nguyễn Văn An",
        parse_birth_date("2002-05-15").unwrap(),
        "CNTT-K15",
        Gpa::new(3.45).unwrap(),
    )
}

// --- Corrupt Persisted Data ---

#[test]
fn test_open_rejects_malformed_blob() {
    let storage = MemoryStorage::new();
    storage.set_item(DEFAULT_STORAGE_KEY, "[{\"studentId\":").unwrap();

    let result = RecordStore::with_storage(storage);
    assert!(matches!(result, Err(StoreError::Deserialization(_))));
}

#[test]
fn test_restore_rejects_out_of_range_gpa() {
    let storage = MemoryStorage::new();
    storage
        .set_item(
            DEFAULT_STORAGE_KEY,
            r#"[{"studentId":"SV001","fullName":"A","birthDate":"2002-05-15","className":"X","gpa":4.5}]"#,
        )
        .unwrap();

    assert!(matches!(
        RecordStore::with_storage(storage),
        Err(StoreError::Deserialization(_))
    ));
}

#[test]
fn test_failed_restore_keeps_current_collection() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = RecordStore::with_storage(Arc::clone(&storage)).unwrap();
    store.add(student("SV001")).unwrap();

    storage.set_item(DEFAULT_STORAGE_KEY, "garbage").unwrap();
    assert!(store.restore().is_err());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_restore_rejects_duplicate_ids() {
    let storage = MemoryStorage::new();
    let one = r#"{"studentId":"SV001","fullName":"A","birthDate":"2002-05-15","className":"X","gpa":3}"#;
    storage
        .set_item(DEFAULT_STORAGE_KEY, &format!("[{},{}]", one, one))
        .unwrap();

    assert!(matches!(
        RecordStore::with_storage(storage),
        Err(StoreError::Corruption(_))
    ));
}

#[test]
fn test_corrupted_file_is_detected() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = RecordStore::with_storage(FileStorage::open(dir.path()).unwrap()).unwrap();
        store.add(student("SV001")).unwrap();
    }

    let path = dir.path().join(format!("{}.kv", DEFAULT_STORAGE_KEY));
    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 6;
    bytes[last] ^= 0x01;
    fs::write(&path, bytes).unwrap();

    let result = RecordStore::with_storage(FileStorage::open(dir.path()).unwrap());
    assert!(matches!(result, Err(StoreError::ChecksumMismatch { .. })));
}

#[test]
fn test_locked_directory() {
    let dir = TempDir::new().unwrap();
    let _store = RecordStore::with_storage(FileStorage::open(dir.path()).unwrap()).unwrap();

    assert!(matches!(
        FileStorage::open(dir.path()),
        Err(StoreError::Locked)
    ));
}

#[test]
fn test_invalid_storage_key() {
    let storage = MemoryStorage::new();
    let dir = TempDir::new().unwrap();
    let files = FileStorage::open(dir.path()).unwrap();

    // Memory storage accepts any key; file storage does not
    storage.set_item("a/b", "[]").unwrap();
    assert!(matches!(
        files.set_item("a/b", "[]"),
        Err(StoreError::InvalidKey(_))
    ));
}

// --- Typed Values ---

#[test]
fn test_gpa_guard() {
    assert!(matches!(Gpa::new(4.2), Err(ValidationError::GpaOutOfRange(_))));
    assert!(matches!(
        "3,5".parse::<Gpa>(),
        Err(ValidationError::InvalidGpa(_))
    ));

    let err: StoreError = Gpa::new(-1.0).unwrap_err().into();
    assert_eq!(err.to_string(), "GPA must be between 0 and 4, got -1");
}

#[test]
fn test_invalid_birth_date() {
    assert_eq!(
        parse_birth_date("2002-13-01"),
        Err(ValidationError::InvalidDate("2002-13-01".into()))
    );
}

// --- Expected Failures Are Not Errors ---

#[test]
fn test_expected_failures_return_false() {
    let mut store = RecordStore::with_storage(MemoryStorage::new()).unwrap();
    assert!(store.add(student("SV001")).unwrap());
    assert!(!store.add(student("SV001")).unwrap());
    assert!(!store.delete("SV999").unwrap());
    assert!(!store
        .update("SV999", (&student("SV999")).into())
        .unwrap());
}

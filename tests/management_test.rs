use std::path::PathBuf;

use chrono::Utc;
use trackfetch::management::{FailureListManager, Persisted, RunRecordManager};
use trackfetch::types::RunRecord;

#[tokio::test]
async fn test_persist_writes_newline_joined_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.txt");
    let manager = FailureListManager::new(&path);

    let failures = vec!["Artist A - Song One".to_string(), "BadLine".to_string()];
    let persisted = manager.persist(&failures).await.unwrap();

    assert_eq!(persisted, Persisted::Written(2));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Artist A - Song One\nBadLine"
    );
    assert_eq!(manager.load().await.unwrap(), failures);
}

#[tokio::test]
async fn test_persist_creates_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("output.txt");

    FailureListManager::new(&path)
        .persist(&["x".to_string()])
        .await
        .unwrap();

    assert!(path.is_file());
}

#[tokio::test]
async fn test_persist_empty_removes_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.txt");
    std::fs::write(&path, "stale").unwrap();

    let manager = FailureListManager::new(&path);
    assert!(manager.exists());

    let persisted = manager.persist(&[]).await.unwrap();
    assert_eq!(persisted, Persisted::RemovedStale);
    assert!(!manager.exists());
}

#[tokio::test]
async fn test_clear_without_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let manager = FailureListManager::new(dir.path().join("output.txt"));

    assert_eq!(manager.clear().await.unwrap(), Persisted::Untouched);
}

#[tokio::test]
async fn test_persist_into_unwritable_location_fails() {
    let dir = tempfile::tempdir().unwrap();
    // a directory cannot be written as a file
    let manager = FailureListManager::new(dir.path());

    let result = manager.persist(&["x".to_string()]).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_run_record_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let manager = RunRecordManager::at(dir.path().join("state").join("last_run.json"));

    let record = RunRecord {
        finished_at: Utc::now(),
        input: PathBuf::from("input.txt"),
        output: PathBuf::from("output.txt"),
        workers: 8,
        total_lines: 10,
        malformed: 1,
        attempted: 9,
        succeeded: 7,
        unresolved: 3,
    };
    manager.persist(&record).await.unwrap();

    let loaded = manager.load().await.unwrap();
    assert_eq!(loaded.finished_at, record.finished_at);
    assert_eq!(loaded.unresolved, 3);
    assert_eq!(loaded.input, PathBuf::from("input.txt"));
}

//! EntryStore integration tests

use sed_tracker::{ensure_database_exists, ensure_entry_table, AppError, EntryPatch, EntryStore, NewEntry};

// ──────────────────────── Helper ────────────────────────

fn new_entry(date: &str) -> NewEntry {
    NewEntry {
        date: date.to_string(),
        category: "work_land".to_string(),
        status: "confirmed".to_string(),
        ship_name: None,
        country: Some("UK".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn create_and_get_roundtrip() {
    let store = EntryStore::in_memory().await.unwrap();
    let created = store.create(new_entry("2024-05-01")).await.unwrap();

    assert_eq!(created.id.len(), 36);
    let loaded = store.get(&created.id).await.unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.country.as_deref(), Some("UK"));
    assert_eq!(loaded.ship_name, None);
}

#[tokio::test]
async fn list_is_in_creation_order() {
    let store = EntryStore::in_memory().await.unwrap();
    assert!(store.list().await.unwrap().is_empty());

    let dates = ["2024-05-03", "2024-05-01", "2024-05-02"];
    let mut ids = Vec::new();
    for d in dates {
        ids.push(store.create(new_entry(d)).await.unwrap().id);
    }

    let listed: Vec<String> = store.list().await.unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn update_merges_patch_and_persists() {
    let store = EntryStore::in_memory().await.unwrap();
    let created = store.create(new_entry("2024-05-01")).await.unwrap();

    let patch = EntryPatch {
        status: Some(Some("pending".to_string())),
        country: Some(None),
        notes: Some(Some("crew change".to_string())),
        ..EntryPatch::default()
    };
    let updated = store.update(&created.id, patch).await.unwrap();

    assert_eq!(updated.status, "pending");
    assert_eq!(updated.country, None);
    assert_eq!(updated.notes.as_deref(), Some("crew change"));
    assert_eq!(updated.date, created.date);
    assert_eq!(updated.category, created.category);
    assert_eq!(store.get(&created.id).await.unwrap(), updated);
}

#[tokio::test]
async fn update_and_delete_unknown_id_are_not_found() {
    let store = EntryStore::in_memory().await.unwrap();

    let err = store.update("nope", EntryPatch::default()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(id) if id == "nope"));

    let err = store.delete("nope").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = store.get("nope").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_only_the_target_row() {
    let store = EntryStore::in_memory().await.unwrap();
    let keep = store.create(new_entry("2024-05-01")).await.unwrap();
    let gone = store.create(new_entry("2024-05-02")).await.unwrap();

    store.delete(&gone.id).await.unwrap();

    let remaining = store.list().await.unwrap();
    assert_eq!(remaining, vec![keep]);
}

#[tokio::test]
async fn entry_table_bootstrap_is_idempotent() {
    let store = EntryStore::in_memory().await.unwrap();
    store.create(new_entry("2024-05-01")).await.unwrap();

    ensure_entry_table(store.pool()).await.unwrap();

    assert_eq!(store.list().await.unwrap().len(), 1);
    store.ping().await.unwrap();
}

#[tokio::test]
async fn file_backed_database_is_created_lazily_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("instance").join("sed_tracker.db");
    let url = format!("sqlite://{}", db_path.display());

    assert!(ensure_database_exists(&url).unwrap());
    assert!(db_path.parent().unwrap().is_dir());

    let store = EntryStore::connect(&url, 2).await.unwrap();
    let created = store.create(new_entry("2024-06-01")).await.unwrap();
    store.pool().close().await;

    assert!(db_path.exists());
    assert!(!ensure_database_exists(&url).unwrap());

    let reopened = EntryStore::connect(&url, 2).await.unwrap();
    assert_eq!(reopened.get(&created.id).await.unwrap(), created);
    reopened.pool().close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_updates_on_file_database_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("sed_tracker.db").display());
    let store = EntryStore::connect(&url, 5).await.unwrap();
    let created = store.create(new_entry("2024-07-01")).await.unwrap();

    let mut handles = Vec::new();
    for n in 0..40 {
        let store = store.clone();
        let id = created.id.clone();
        handles.push(tokio::spawn(async move {
            let patch = EntryPatch {
                status: Some(Some(format!("status-{}", n))),
                ..EntryPatch::default()
            };
            store.update(&id, patch).await
        }));
    }
    for handle in handles {
        let updated = handle.await.unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.date, "2024-07-01");
    }

    let stored = store.get(&created.id).await.unwrap();
    assert!(stored.status.starts_with("status-"));
    store.pool().close().await;
}

#[tokio::test]
async fn update_with_no_known_fields_returns_stored_entry() {
    let store = EntryStore::in_memory().await.unwrap();
    let created = store.create(new_entry("2024-05-01")).await.unwrap();

    let unchanged = store.update(&created.id, EntryPatch::default()).await.unwrap();
    assert_eq!(unchanged, created);

    let err = store.update("nope", EntryPatch::default()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn named_shared_memory_database_is_shared_between_stores() {
    let url = "sqlite:file:entry_store_shared?mode=memory&cache=shared";
    let first = EntryStore::connect(url, 2).await.unwrap();
    let created = first.create(new_entry("2024-08-01")).await.unwrap();

    let second = EntryStore::connect(url, 2).await.unwrap();
    assert_eq!(second.get(&created.id).await.unwrap(), created);
    assert!(!ensure_database_exists(url).unwrap());
}

#[test]
fn in_memory_url_needs_no_directory() {
    assert!(!ensure_database_exists("sqlite::memory:").unwrap());
}

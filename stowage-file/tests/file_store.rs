use std::sync::Arc;

use stowage_backend::{Options, Store, StoreError, StoreExt, Value};
use stowage_file::{FileConfig, FileError, FileStore, STAGING_DIR};

fn root_entries(store: &FileStore) -> Vec<String> {
    let mut names = std::fs::read_dir(store.root())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    names
}

async fn open() -> (tempfile::TempDir, FileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("store")).await.unwrap();
    (dir, store)
}

#[tokio::test]
async fn values_survive_reopen() {
    let (dir, store) = open().await;
    let value: Value = [
        ("name".to_owned(), Value::from("stowage")),
        ("bytes".to_owned(), Value::from(vec![0u8, 1, 2])),
    ]
    .into_iter()
    .collect();

    store.set("record", value.clone()).await.unwrap();
    drop(store);

    let reopened = FileStore::open(dir.path().join("store")).await.unwrap();
    assert_eq!(reopened.get("record").await.unwrap(), Some(value));
}

#[tokio::test]
async fn one_file_per_key() {
    let (_dir, store) = open().await;

    store.set("ab/cdef", 1).await.unwrap();
    store.set("plain", 2).await.unwrap();

    assert!(store.root().join("ab").join("cdef").is_file());
    assert!(store.root().join("plain").is_file());
}

#[tokio::test]
async fn delete_returns_previous_value() {
    let (_dir, store) = open().await;
    store.set("a", "x").await.unwrap();

    assert_eq!(store.remove("a").await.unwrap(), Some(Value::from("x")));
    assert_eq!(store.remove("a").await.unwrap(), None);
    assert!(!store.has("a").await.unwrap());
    assert!(!store.root().join("a").exists());
}

#[tokio::test]
async fn missing_keys_are_absent() {
    let (_dir, store) = open().await;
    store.set("dir/file", 1).await.unwrap();

    assert_eq!(store.get("nothing").await.unwrap(), None);
    // "dir/file" is a file, so nothing can live below it
    assert_eq!(store.get("dir/file/below").await.unwrap(), None);
    assert!(!store.has("dir").await.unwrap());
}

#[tokio::test]
async fn counters_are_atomic_within_process() {
    let (_dir, store) = open().await;
    let store = Arc::new(store);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..10 {
                    store.incr("hits", 1).await.unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(store.get("hits").await.unwrap(), Some(Value::Integer(80)));
    assert_eq!(store.incr("hits", -80).await.unwrap(), 0);
}

#[tokio::test]
async fn increment_on_non_counter_fails() {
    let (_dir, store) = open().await;
    store.set("a", Value::List(vec![])).await.unwrap();

    assert!(matches!(
        store.incr("a", 1).await,
        Err(StoreError::NotAnInteger("list"))
    ));
}

#[tokio::test]
async fn clear_keeps_root() {
    let (_dir, store) = open().await;
    store.set("a", 1).await.unwrap();
    store.set("b/c", 2).await.unwrap();

    store.clear(&Options::default()).await.unwrap();

    assert!(store.root().is_dir());
    assert_eq!(root_entries(&store), vec![STAGING_DIR]);
    assert_eq!(store.get("a").await.unwrap(), None);
}

#[tokio::test]
async fn temp_names_do_not_collide_with_keys() {
    let (_dir, store) = open().await;
    store.set("a.0.tmp", "kept").await.unwrap();
    store.set("a", 1).await.unwrap();
    store.set("a", 2).await.unwrap();

    assert_eq!(store.get("a.0.tmp").await.unwrap(), Some(Value::from("kept")));
    assert_eq!(root_entries(&store), vec![STAGING_DIR, "a", "a.0.tmp"]);
    assert_eq!(
        std::fs::read_dir(store.root().join(STAGING_DIR)).unwrap().count(),
        0
    );
}

#[tokio::test]
async fn staging_files_survive_clear() {
    let (_dir, store) = open().await;
    let pending = store.root().join(STAGING_DIR).join("pending");
    std::fs::write(&pending, b"x").unwrap();
    store.set("a", 1).await.unwrap();

    store.clear(&Options::default()).await.unwrap();

    assert!(pending.is_file());
    assert!(matches!(
        store.set(STAGING_DIR, 1).await,
        Err(StoreError::InvalidKey(_))
    ));
}

#[tokio::test]
async fn traversal_never_touches_outside_root() {
    let (dir, store) = open().await;

    let result = store.set("../outside", 1).await;

    assert!(matches!(result, Err(StoreError::InvalidKey(_))));
    assert!(!dir.path().join("outside").exists());
}

#[tokio::test]
async fn config_opens_store() {
    let dir = tempfile::tempdir().unwrap();
    let config: FileConfig =
        serde_json::from_value(serde_json::json!({"dir": dir.path().join("cfg")})).unwrap();

    let store = config.into_store().await.unwrap();
    store.set("a", 1).await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), Some(Value::Integer(1)));
}

#[tokio::test]
async fn root_must_be_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("file");
    std::fs::write(&file, b"x").unwrap();

    assert!(matches!(
        FileStore::open(&file).await,
        Err(FileError::Io(_) | FileError::InvalidConfig(_))
    ));
}

use std::sync::Arc;

use stowage_backend::{Options, Store, StoreExt, Value};
use stowage_memory::{MemoryConfig, MemoryStore, NullStore};

#[tokio::test]
async fn basic_operations() {
    let store = MemoryStore::new();

    assert_eq!(store.set("a", 1).await.unwrap(), Value::Integer(1));
    assert!(store.has("a").await.unwrap());
    assert_eq!(store.get("a").await.unwrap(), Some(Value::Integer(1)));
    assert_eq!(store.remove("a").await.unwrap(), Some(Value::Integer(1)));
    assert!(!store.has("a").await.unwrap());
}

#[tokio::test]
async fn structured_keys_address_distinct_entries() {
    let store = MemoryStore::new();
    let list = Value::List(vec![Value::from("a"), Value::from(1)]);

    store.set(list.clone(), "list").await.unwrap();
    store.set("a", "text").await.unwrap();
    store.set(1.0, "float").await.unwrap();

    assert_eq!(store.get(list).await.unwrap(), Some(Value::from("list")));
    assert_eq!(store.get(1.0).await.unwrap(), Some(Value::from("float")));
    assert_eq!(store.get(1).await.unwrap(), None);
}

#[tokio::test]
async fn clear_removes_everything() {
    let store = MemoryStore::new();
    for i in 0..10 {
        store.set(i, i).await.unwrap();
    }

    store.clear(&Options::default()).await.unwrap();

    for i in 0..10 {
        assert_eq!(store.get(i).await.unwrap(), None);
    }
    assert_eq!(store.cache().entry_count(), 0);
}

#[tokio::test]
async fn concurrent_increments_are_not_lost() {
    let store = Arc::new(MemoryStore::new());

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    store.incr("hits", 1).await.unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(store.get("hits").await.unwrap(), Some(Value::Integer(800)));
}

#[tokio::test]
async fn config_bounds_the_store() {
    let config: MemoryConfig = serde_json::from_value(serde_json::json!({"max_entries": 5})).unwrap();
    assert_eq!(config.max_entries, Some(5));

    let store = config.into_store();
    for i in 0..50 {
        store.set(i, i).await.unwrap();
    }
    store.cache().run_pending_tasks().await;

    assert!(store.cache().entry_count() <= 5);
}

#[tokio::test]
async fn null_store_forgets() {
    let store = NullStore;

    assert_eq!(store.set("a", 1).await.unwrap(), Value::Integer(1));
    assert_eq!(store.get("a").await.unwrap(), None);
    assert!(!store.has("a").await.unwrap());
    assert_eq!(store.incr("a", 3).await.unwrap(), 3);
    assert_eq!(store.label().as_str(), "null");
}

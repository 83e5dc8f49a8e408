//! Integration tests for the two-tier `Cache`.

mod common;

use common::TestStore;
use stowage_backend::{
    BoxStore, Cache, Compose, Key, Options, Store, StoreError, StoreExt, Value,
};

fn pair() -> (TestStore, TestStore, Cache<TestStore, TestStore>) {
    let cache = TestStore::new();
    let backend = TestStore::new();
    let composed = Cache::new(cache.clone(), backend.clone());
    (cache, backend, composed)
}

#[tokio::test]
async fn store_writes_both_layers() {
    let (cache, backend, composed) = pair();

    let returned = composed.set("a", "x").await.unwrap();

    assert_eq!(returned, Value::from("x"));
    assert_eq!(cache.get_raw(&Key::from("a")), Some(Value::from("x")));
    assert_eq!(backend.get_raw(&Key::from("a")), Some(Value::from("x")));
}

#[tokio::test]
async fn miss_in_cache_is_served_from_backend_and_refilled() {
    let (cache, backend, composed) = pair();
    composed.set("a", "x").await.unwrap();

    cache.wipe();
    assert_eq!(composed.get("a").await.unwrap(), Some(Value::from("x")));
    assert_eq!(cache.get_raw(&Key::from("a")), Some(Value::from("x")));
    assert_eq!(backend.len(), 1);
}

#[tokio::test]
async fn cache_hit_does_not_consult_backend() {
    let (cache, backend, composed) = pair();
    cache.insert_raw("a", "cached");
    backend.insert_raw("a", "stored");

    assert_eq!(composed.get("a").await.unwrap(), Some(Value::from("cached")));
}

#[tokio::test]
async fn full_miss_is_absent() {
    let (cache, _backend, composed) = pair();

    assert_eq!(composed.get("missing").await.unwrap(), None);
    assert!(!composed.has("missing").await.unwrap());
    assert_eq!(cache.len(), 0);
}

#[tokio::test]
async fn contains_checks_either_layer() {
    let (cache, backend, composed) = pair();
    cache.insert_raw("only-cache", 1);
    backend.insert_raw("only-backend", 2);

    assert!(composed.has("only-cache").await.unwrap());
    assert!(composed.has("only-backend").await.unwrap());
}

#[tokio::test]
async fn increment_invalidates_cached_counter() {
    let (cache, backend, composed) = pair();
    composed.set("n", 1).await.unwrap();
    assert_eq!(composed.get("n").await.unwrap(), Some(Value::Integer(1)));

    assert_eq!(composed.incr("n", 4).await.unwrap(), 5);

    assert_eq!(cache.get_raw(&Key::from("n")), None);
    assert_eq!(backend.get_raw(&Key::from("n")), Some(Value::Integer(5)));
    assert_eq!(composed.get("n").await.unwrap(), Some(Value::Integer(5)));
}

#[tokio::test]
async fn delete_prefers_cached_value() {
    let (cache, backend, composed) = pair();
    cache.insert_raw("a", "cached");
    backend.insert_raw("a", "stored");

    assert_eq!(
        composed.remove("a").await.unwrap(),
        Some(Value::from("cached"))
    );
    assert_eq!(cache.len(), 0);
    assert_eq!(backend.len(), 0);

    backend.insert_raw("b", "stored");
    assert_eq!(
        composed.remove("b").await.unwrap(),
        Some(Value::from("stored"))
    );
}

#[tokio::test]
async fn clear_empties_both_layers() {
    let (cache, backend, composed) = pair();
    composed.set("a", 1).await.unwrap();
    composed.set("b", 2).await.unwrap();

    composed.clear(&Options::default()).await.unwrap();

    assert_eq!(cache.len(), 0);
    assert_eq!(backend.len(), 0);
}

#[tokio::test]
async fn close_reaches_backend_when_cache_fails() {
    let cache = TestStore::failing_close();
    let backend = TestStore::new();
    let composed = cache.clone().compose(backend.clone());

    let result = composed.close().await;

    assert!(matches!(result, Err(StoreError::InternalError(_))));
    assert_eq!(cache.closes(), 1);
    assert_eq!(backend.closes(), 1);
}

#[tokio::test]
async fn second_close_is_a_noop() {
    let (cache, backend, composed) = pair();

    composed.close().await.unwrap();
    composed.close().await.unwrap();

    assert_eq!(cache.closes(), 1);
    assert_eq!(backend.closes(), 1);
}

#[test]
fn label_joins_both_tiers() {
    let (_, _, composed) = pair();
    assert_eq!(composed.label().as_str(), "test.test");

    let nested = Cache::new(TestStore::new(), composed);
    assert_eq!(nested.label().as_str(), "test.test.test");
    assert_eq!(nested.with_label("sessions").label().as_str(), "sessions");
}

#[tokio::test]
async fn nested_caches_behave_as_one_store() {
    let l1 = TestStore::new();
    let l2 = TestStore::new();
    let l3 = TestStore::new();
    let inner: BoxStore = Box::new(l2.clone().compose(l3.clone()));
    let outer = Cache::new(Box::new(l1.clone()) as BoxStore, inner);

    outer.set("k", "v").await.unwrap();
    l1.wipe();
    l2.wipe();

    assert_eq!(outer.get("k").await.unwrap(), Some(Value::from("v")));
    assert_eq!(l1.get_raw(&Key::from("k")), Some(Value::from("v")));
    assert_eq!(l2.get_raw(&Key::from("k")), Some(Value::from("v")));
}

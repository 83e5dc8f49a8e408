//! Integration tests for the `Transformer` proxy.

mod common;

use common::TestStore;
use pretty_assertions::assert_eq;
use stowage_backend::{
    Key, PipelineError, Step, StoreExt, Transformer, TransformerConfig, Value,
    format::{BincodeFormat, Format},
};

fn config(key: &[Step], value: &[Step], prefix: Option<&str>) -> TransformerConfig {
    TransformerConfig {
        key: key.to_vec(),
        value: value.to_vec(),
        prefix: prefix.map(str::to_owned),
    }
}

#[tokio::test]
async fn prefixed_physical_key() {
    let memory = TestStore::new();
    let store = Transformer::new(memory.clone(), &config(&[Step::Bincode], &[], Some("ns:")))
        .unwrap();

    store.set("a", "x").await.unwrap();

    let mut expected = b"ns:".to_vec();
    expected.extend_from_slice(&BincodeFormat.serialize(&Value::from("a")).unwrap());
    assert_eq!(memory.keys(), vec![Value::from(expected)]);
}

#[tokio::test]
async fn values_round_trip_through_every_reversible_pipeline() {
    let value: Value = [
        ("id".to_owned(), Value::from(7)),
        ("name".to_owned(), Value::from("stowage")),
        ("raw".to_owned(), Value::from(vec![1u8, 2, 3])),
    ]
    .into_iter()
    .collect();

    let mut pipelines = vec![
        vec![Step::Bincode],
        vec![Step::Json, Step::Base64],
        vec![Step::Ron, Step::Hex],
    ];
    if cfg!(feature = "gzip") {
        pipelines.push(vec![Step::Bincode, Step::Zlib, Step::Base64]);
        pipelines.push(vec![Step::Json, Step::Gzip]);
    }

    for steps in pipelines {
        let memory = TestStore::new();
        let store = Transformer::new(memory.clone(), &config(&[Step::Json], &steps, None))
            .unwrap();

        assert_eq!(store.set("k", value.clone()).await.unwrap(), value);
        assert_ne!(memory.get_raw(&store.physical_key(&Key::from("k")).unwrap()), Some(value.clone()));
        assert_eq!(store.get("k").await.unwrap(), Some(value.clone()), "{steps:?}");
        assert_eq!(store.remove("k").await.unwrap(), Some(value.clone()));
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}

#[tokio::test]
async fn unserialized_text_and_bytes_come_back_unchanged() {
    let mut pipelines = vec![vec![Step::Base64], vec![Step::Hex]];
    if cfg!(feature = "gzip") {
        pipelines.push(vec![Step::Zlib]);
        pipelines.push(vec![Step::Gzip, Step::Base64]);
    }

    for steps in pipelines {
        let memory = TestStore::new();
        let store = Transformer::new(memory.clone(), &config(&[], &steps, None)).unwrap();

        store.set("text", "hello").await.unwrap();
        store.set("bytes", b"hello".to_vec()).await.unwrap();

        assert_eq!(store.get("text").await.unwrap(), Some(Value::from("hello")), "{steps:?}");
        assert_eq!(
            store.get("bytes").await.unwrap(),
            Some(Value::from(b"hello".to_vec())),
            "{steps:?}"
        );
        assert_eq!(store.remove("text").await.unwrap(), Some(Value::from("hello")));
    }
}

#[tokio::test]
async fn structured_value_needs_a_serializer() {
    let store = Transformer::new(TestStore::new(), &config(&[], &[Step::Base64], None)).unwrap();
    assert!(store.set("k", 1).await.is_err());
}

#[tokio::test]
async fn keys_are_deterministic() {
    let memory = TestStore::new();
    let store = Transformer::new(
        memory.clone(),
        &config(&[Step::Bincode, Step::Sha256, Step::Spread], &[Step::Bincode], None),
    )
    .unwrap();

    let first = store.physical_key(&Key::from("user:1")).unwrap();
    let second = store.physical_key(&Key::from("user:1")).unwrap();
    assert_eq!(first, second);

    store.set("user:1", 1).await.unwrap();
    store.set("user:1", 2).await.unwrap();
    assert_eq!(memory.len(), 1);

    let text = first.as_text().unwrap();
    assert_eq!(text.len(), 65);
    assert_eq!(&text[2..3], "/");
}

#[tokio::test]
async fn contains_uses_physical_key() {
    let memory = TestStore::new();
    let store =
        Transformer::new(memory.clone(), &config(&[], &[], Some("p/"))).unwrap();

    store.set("a", 1).await.unwrap();

    assert!(store.has("a").await.unwrap());
    assert_eq!(memory.get_raw(&Key::from("p/a")), Some(Value::Integer(1)));
}

#[tokio::test]
async fn counters_are_returned_raw() {
    let memory = TestStore::new();
    let store = Transformer::new(
        memory.clone(),
        &config(&[Step::Json], &[Step::Json, Step::Base64], None),
    )
    .unwrap();

    assert_eq!(store.incr("hits", 2).await.unwrap(), 2);
    assert_eq!(store.incr("hits", 3).await.unwrap(), 5);
    assert_eq!(store.get("hits").await.unwrap(), Some(Value::Integer(5)));
}

#[test]
fn irreversible_value_step_is_rejected() {
    let result = Transformer::new(TestStore::new(), &config(&[], &[Step::Escape], None));
    assert!(matches!(
        result,
        Err(PipelineError::Irreversible(Step::Escape))
    ));
}

#[test]
fn config_deserializes_step_names() {
    let config: TransformerConfig =
        serde_json::from_value(serde_json::json!({"key": ["marshal", "prefix"], "prefix": "ns:"}))
            .unwrap();
    assert_eq!(config.key, vec![Step::Bincode, Step::Prefix]);
    assert!(config.value.is_empty());
    assert_eq!(config.prefix.as_deref(), Some("ns:"));
}

//! Key Pipeline Example
//!
//! Demonstrates how a transformer pipeline derives physical keys.
//!
//! Pipelines shown:
//!   - bincode + prefix: compact binary keys in a namespace
//!   - bincode + prefix + base64: the same keys, safe for text-only stores
//!   - bincode + sha256 + spread: fixed-length keys spread over directories
//!
//! Run:
//!   cargo run -p stowage-backend --example key_pipeline_usage
//!
//! Expected output:
//!   The physical key each pipeline produces for the same logical key.

use stowage_backend::{Pipeline, Step, Value};

fn main() {
    let key = Value::List(vec!["user".into(), 42.into()]);
    println!("Logical key: {key:?}\n");

    let pipelines: [(&str, &[Step]); 3] = [
        ("bincode + prefix", &[Step::Bincode]),
        ("bincode + prefix + base64", &[Step::Bincode, Step::Prefix, Step::Base64]),
        ("bincode + sha256 + spread", &[Step::Bincode, Step::Sha256, Step::Spread]),
    ];

    for (name, steps) in pipelines {
        let pipeline = Pipeline::keys(steps, Some("app:")).expect("valid key pipeline");
        let physical = pipeline.forward(key.clone()).expect("key encodes");
        println!("{name}");
        println!("  steps:    {:?}", pipeline.steps());
        println!("  physical: {physical:?}\n");
    }
}

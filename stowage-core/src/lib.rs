#![warn(missing_docs)]
//! # stowage-core
//!
//! Core types shared by every layer of a stowage store stack.
//!
//! This crate has no notion of storage. It defines the data that flows
//! through a stack of stores:
//!
//! - [`Value`] - the dynamically typed value model used for keys and values
//! - [`Options`] - immutable per-call options threaded through every layer
//! - [`StoreLabel`] - names identifying stores in logs and composed stacks
//!
//! The store contract itself lives in `stowage-backend`.

pub mod label;
pub mod options;
pub mod value;

pub use label::StoreLabel;
pub use options::{Expiry, Options};
pub use value::{Key, Value};

/// Raw byte data type used for encoded keys and values.
/// Using `Bytes` provides efficient zero-copy cloning via reference counting.
pub type Raw = bytes::Bytes;

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod store;

pub use error::FileError;
pub use store::{FileConfig, FileStore, STAGING_DIR};

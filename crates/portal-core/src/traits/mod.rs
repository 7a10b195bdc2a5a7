//! Core traits defined in `portal-core` and implemented by other crates.

pub mod storage;

pub use storage::{ByteStream, StorageProvider};

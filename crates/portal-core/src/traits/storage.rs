//! Storage provider trait for uploaded video files.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for writing file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for video storage backends.
///
/// Defined here and implemented in `portal-storage`. Paths are relative to
/// the provider's root and never contain `..` components.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is usable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write a byte stream to `path`, returning the number of bytes written.
    async fn write_stream(&self, path: &str, stream: ByteStream) -> AppResult<u64>;

    /// Move (rename) a file within this provider.
    async fn rename(&self, from: &str, to: &str) -> AppResult<()>;

    /// Delete a file. Missing files are not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Create the provider root if it does not exist yet.
    async fn ensure_root(&self) -> AppResult<()>;
}

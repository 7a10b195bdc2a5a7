//! # portal-storage
//!
//! Disk storage for uploaded lecture videos. The [`UploadReceiver`] filters
//! by MIME type, enforces the size limit while streaming, and names stored
//! files; the provider does the actual filesystem work.

pub mod providers;
pub mod upload;

pub use providers::LocalStorageProvider;
pub use upload::{LimitTripped, STAGING_DIR, StoredUpload, UploadReceiver, cap_stream};

//! Video file upload.

pub mod service;

pub use service::UploadService;

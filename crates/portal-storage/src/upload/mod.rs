//! Upload receiving: MIME filtering, size limiting, and file naming.

pub mod limit;
pub mod naming;
pub mod receiver;

pub use limit::{LimitTripped, cap_stream, limit_stream};
pub use naming::{sanitize_file_name, stored_file_name};
pub use receiver::{STAGING_DIR, StoredUpload, UploadReceiver};

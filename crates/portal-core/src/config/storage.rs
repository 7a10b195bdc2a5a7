//! Video storage configuration.

use serde::{Deserialize, Serialize};

/// Storage configuration for uploaded lecture videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory uploaded videos are written to. Created on first upload.
    #[serde(default = "default_video_dir")]
    pub video_dir: String,
    /// URL path prefix under which stored videos are served.
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    /// Maximum upload size in bytes (default 100 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            video_dir: default_video_dir(),
            public_prefix: default_public_prefix(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_video_dir() -> String {
    "./public/videos".to_string()
}

fn default_public_prefix() -> String {
    "/videos".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MiB
}

use serde::{Deserialize, Serialize};

use crate::platform;

/// Persisted configuration for the downloads feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DownloadsSettings {
    /// Location of the SQLite database holding download records.
    pub database_path: String,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for DownloadsSettings {
    fn default() -> Self {
        Self {
            database_path: platform::get_data_dir()
                .join("downloads.db")
                .to_string_lossy()
                .to_string(),
            log_filter: "info".to_string(),
        }
    }
}

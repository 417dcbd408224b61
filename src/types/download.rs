use serde::{Deserialize, Serialize};

/// Lifecycle status of a recorded download.
///
/// A failed download keeps `Started`; there is no persisted failure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    Started,
    Finished,
}

impl DownloadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadStatus::Started => "started",
            DownloadStatus::Finished => "finished",
        }
    }

    /// Parses the persisted column value; `None` for anything unrecognized.
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "started" => Some(DownloadStatus::Started),
            "finished" => Some(DownloadStatus::Finished),
            _ => None,
        }
    }
}

/// One persisted download record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadItem {
    pub download_id: i64,
    pub file_name: String,
    pub file_path: String,
    /// Size in bytes, 0 until the download finishes.
    #[serde(default)]
    pub content_length: u64,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    pub download_status: DownloadStatus,
}

impl DownloadItem {
    /// Creates a freshly started record stamped with the current time.
    pub fn started(download_id: i64, file_name: &str, file_path: &str) -> Self {
        Self {
            download_id,
            file_name: file_name.to_string(),
            file_path: file_path.to_string(),
            content_length: 0,
            created_at: chrono::Utc::now().timestamp_millis(),
            download_status: DownloadStatus::Started,
        }
    }
}

use thiserror::Error;

// === DownloadsError ===

/// Errors raised by the downloads repository, view-model and callback.
#[derive(Debug, Error)]
pub enum DownloadsError {
    /// The backing store could not be read or written.
    #[error("Downloads repository unavailable: {0}")]
    RepositoryUnavailable(String),
    /// A file could not be inspected or removed.
    #[error("File system error at {path}: {reason}")]
    FileSystem { path: String, reason: String },
    /// No record exists for the given download id.
    #[error("Download not found: {0}")]
    NotFound(i64),
    /// A content length does not fit the store's signed 64-bit column.
    #[error("Content length out of range: {0}")]
    ContentLengthOutOfRange(u64),
    /// A background task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<rusqlite::Error> for DownloadsError {
    fn from(e: rusqlite::Error) -> Self {
        DownloadsError::RepositoryUnavailable(e.to_string())
    }
}

impl From<tokio::task::JoinError> for DownloadsError {
    fn from(e: tokio::task::JoinError) -> Self {
        DownloadsError::Task(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to loading and saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    Io(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    Serialization(String),
}

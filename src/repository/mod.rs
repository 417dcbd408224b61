//! Persistent store of download records.
//!
//! [`DownloadsRepository`] is the seam between the downloads screen and
//! storage; [`SqliteDownloadsRepository`] is the shipped implementation.

pub mod sqlite;

use tokio::sync::watch;

use crate::types::download::{DownloadItem, DownloadStatus};
use crate::types::errors::DownloadsError;

pub use sqlite::SqliteDownloadsRepository;

/// CRUD and reactive access to download records, newest first.
///
/// Calls block on I/O; async callers run them on the blocking pool.
pub trait DownloadsRepository: Send + Sync {
    fn get_downloads(&self) -> Result<Vec<DownloadItem>, DownloadsError>;
    /// Subscribes to the full record list. The receiver holds the current list
    /// immediately and is updated after every mutation.
    fn subscribe(&self) -> watch::Receiver<Vec<DownloadItem>>;
    fn get_download_item(&self, download_id: i64) -> Result<Option<DownloadItem>, DownloadsError>;
    fn insert(&self, item: &DownloadItem) -> Result<(), DownloadsError>;
    fn insert_all(&self, items: &[DownloadItem]) -> Result<(), DownloadsError>;
    fn update(
        &self,
        download_id: i64,
        status: DownloadStatus,
        content_length: u64,
    ) -> Result<(), DownloadsError>;
    fn delete(&self, download_id: i64) -> Result<(), DownloadsError>;
    fn delete_all(&self) -> Result<(), DownloadsError>;
    /// Removes every record and returns them, newest first, as one atomic step.
    /// Nothing inserted concurrently can be cleared without being returned.
    fn take_all(&self) -> Result<Vec<DownloadItem>, DownloadsError>;
}

//! Recording of download lifecycle events reported by the download engine.
//!
//! `Started → Finished` on success. On failure nothing is written: the record
//! keeps `Started` and only a notification is emitted.

use std::sync::Arc;

use tracing::{info, warn};

use crate::services::command_channel::{command_channel, CommandReceiver, CommandSender};
use crate::repository::DownloadsRepository;
use crate::types::command::DownloadCommand;
use crate::types::download::{DownloadItem, DownloadStatus};
use crate::types::errors::DownloadsError;

/// Lifecycle hooks invoked by a download engine.
pub trait DownloadCallback: Send + Sync {
    fn on_start(&self, item: DownloadItem) -> Result<(), DownloadsError>;
    fn on_success(&self, download_id: i64, content_length: u64) -> Result<(), DownloadsError>;
    fn on_failure(&self, download_id: i64) -> Result<(), DownloadsError>;
}

/// [`DownloadCallback`] that writes to the downloads repository and emits
/// [`DownloadCommand`]s for the host to show.
///
/// One instance lives for the whole process, owned by [`crate::app::App`].
pub struct FileDownloadCallback {
    repository: Arc<dyn DownloadsRepository>,
    commands: CommandSender<DownloadCommand>,
    command_rx: CommandReceiver<DownloadCommand>,
}

impl FileDownloadCallback {
    pub fn new(repository: Arc<dyn DownloadsRepository>) -> Self {
        let (commands, command_rx) = command_channel();
        Self {
            repository,
            commands,
            command_rx,
        }
    }

    /// Receiver for notifications. Only the newest undelivered one is kept.
    pub fn commands(&self) -> CommandReceiver<DownloadCommand> {
        self.command_rx.clone()
    }
}

impl DownloadCallback for FileDownloadCallback {
    /// Records the new download as `Started` and announces it.
    fn on_start(&self, item: DownloadItem) -> Result<(), DownloadsError> {
        let item = DownloadItem {
            download_status: DownloadStatus::Started,
            ..item
        };
        self.repository.insert(&item)?;
        info!(download_id = item.download_id, file_name = %item.file_name, "download started");
        self.commands.send(DownloadCommand::ShowDownloadStartedMessage);
        Ok(())
    }

    fn on_success(&self, download_id: i64, content_length: u64) -> Result<(), DownloadsError> {
        self.repository
            .update(download_id, DownloadStatus::Finished, content_length)?;
        let item = self
            .repository
            .get_download_item(download_id)?
            .ok_or(DownloadsError::NotFound(download_id))?;
        info!(download_id, content_length, "download finished");
        self.commands.send(DownloadCommand::ShowDownloadSuccessMessage {
            file_name: item.file_name,
            file_path: item.file_path,
        });
        Ok(())
    }

    fn on_failure(&self, download_id: i64) -> Result<(), DownloadsError> {
        // No Failed status exists; the record stays Started.
        warn!(download_id, "download failed");
        self.commands.send(DownloadCommand::ShowDownloadFailedMessage);
        Ok(())
    }
}

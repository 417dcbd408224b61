//! View-model behind the downloads screen.
//!
//! Owns the grouped view state and the one-shot [`Command`] stream, and turns
//! user gestures into repository mutations and file deletions. Blocking work
//! (SQLite, `std::fs`, grouping) runs on tokio's blocking pool.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::services::command_channel::{command_channel, CommandReceiver, CommandSender};
use crate::services::file_system::FileSystem;
use crate::services::view_item_mapper;
use crate::repository::DownloadsRepository;
use crate::types::command::{Command, DismissReason, Message};
use crate::types::download::DownloadItem;
use crate::types::errors::DownloadsError;
use crate::types::view_item::DownloadViewItem;

/// State holder for the downloads list.
pub struct DownloadsViewModel {
    repository: Arc<dyn DownloadsRepository>,
    files: Arc<dyn FileSystem>,
    commands: CommandSender<Command>,
    command_rx: CommandReceiver<Command>,
}

impl DownloadsViewModel {
    pub fn new(repository: Arc<dyn DownloadsRepository>, files: Arc<dyn FileSystem>) -> Self {
        let (commands, command_rx) = command_channel();
        Self {
            repository,
            files,
            commands,
            command_rx,
        }
    }

    /// Receiver for one-shot commands. Only the newest undelivered command is kept.
    pub fn commands(&self) -> CommandReceiver<Command> {
        self.command_rx.clone()
    }

    /// Grouped view items, recomputed after every repository change.
    ///
    /// The returned receiver holds the latest grouping only. The background
    /// task stops once every receiver is dropped. Must be called from within
    /// a tokio runtime.
    pub fn downloads(&self) -> watch::Receiver<Vec<DownloadViewItem>> {
        let mut source = self.repository.subscribe();
        let initial = view_item_mapper::to_view_items(&source.borrow_and_update());
        let (tx, rx) = watch::channel(initial);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = source.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = tx.closed() => break,
                }
                let items = (*source.borrow_and_update()).clone();
                let grouped =
                    tokio::task::spawn_blocking(move || view_item_mapper::to_view_items(&items)).await;
                let view_items = match grouped {
                    Ok(view_items) => view_items,
                    Err(e) => {
                        warn!(error = %e, "grouping downloads failed");
                        break;
                    }
                };
                if tx.send(view_items).is_err() {
                    break;
                }
            }
            debug!("downloads view stream closed");
        });

        rx
    }

    /// Clears every record and offers undo. Files stay on disk until the undo
    /// message is dismissed without the undo action.
    pub async fn delete_all_downloaded_items(&self) -> Result<(), DownloadsError> {
        let repository = self.repository.clone();
        let removed = tokio::task::spawn_blocking(move || repository.take_all()).await??;

        info!(count = removed.len(), "all download records deleted");
        self.commands.send(Command::DisplayUndoMessage {
            message: Message::AllDownloadsDeleted,
            items: removed,
        });
        Ok(())
    }

    /// Removes one record.
    pub async fn delete(&self, item: &DownloadItem) -> Result<(), DownloadsError> {
        let repository = self.repository.clone();
        let download_id = item.download_id;
        tokio::task::spawn_blocking(move || repository.delete(download_id)).await??;
        Ok(())
    }

    /// Reinserts records removed earlier (undo path).
    pub async fn insert(&self, items: Vec<DownloadItem>) -> Result<(), DownloadsError> {
        let repository = self.repository.clone();
        tokio::task::spawn_blocking(move || repository.insert_all(&items)).await??;
        Ok(())
    }

    /// Deletes the backing files. Every file is attempted; the first failure is returned.
    pub async fn delete_files_from_disk(&self, items: Vec<DownloadItem>) -> Result<(), DownloadsError> {
        let files = self.files.clone();
        tokio::task::spawn_blocking(move || {
            let mut first_error = None;
            for item in &items {
                if let Err(e) = files.delete(&item.file_path) {
                    warn!(error = %e, download_id = item.download_id, "failed to delete downloaded file");
                    first_error.get_or_insert(e);
                }
            }
            first_error.map_or(Ok(()), Err)
        })
        .await?
    }

    /// Opens the file, or cleans up the record if the file is gone.
    pub async fn on_item_clicked(&self, item: DownloadItem) -> Result<(), DownloadsError> {
        debug!(download_id = item.download_id, "download clicked");
        if self.file_exists(&item).await? {
            self.commands.send(Command::OpenFile { item });
            Ok(())
        } else {
            self.remove_missing(&item).await
        }
    }

    /// Shares the file, or cleans up the record if the file is gone.
    pub async fn on_share_item_clicked(&self, item: DownloadItem) -> Result<(), DownloadsError> {
        debug!(download_id = item.download_id, "download share clicked");
        if self.file_exists(&item).await? {
            self.commands.send(Command::ShareFile { item });
            Ok(())
        } else {
            self.remove_missing(&item).await
        }
    }

    /// Removes the record right away and offers undo for it.
    pub async fn on_delete_item_clicked(&self, item: DownloadItem) -> Result<(), DownloadsError> {
        self.delete(&item).await?;
        debug!(download_id = item.download_id, "download record deleted");
        self.commands.send(Command::DisplayUndoMessage {
            message: Message::DownloadDeleted {
                file_name: item.file_name.clone(),
            },
            items: vec![item],
        });
        Ok(())
    }

    /// Ends the undo window for `items`: the undo action restores the
    /// records, any other dismissal deletes the files for good.
    pub async fn on_undo_message_dismissed(
        &self,
        items: Vec<DownloadItem>,
        reason: DismissReason,
    ) -> Result<(), DownloadsError> {
        if reason.is_undo() {
            info!(count = items.len(), "restoring deleted downloads");
            self.insert(items).await
        } else {
            debug!(?reason, count = items.len(), "undo window closed");
            self.delete_files_from_disk(items).await
        }
    }

    async fn file_exists(&self, item: &DownloadItem) -> Result<bool, DownloadsError> {
        let files = self.files.clone();
        let path = item.file_path.clone();
        Ok(tokio::task::spawn_blocking(move || files.exists(&path)).await?)
    }

    async fn remove_missing(&self, item: &DownloadItem) -> Result<(), DownloadsError> {
        warn!(download_id = item.download_id, path = %item.file_path, "downloaded file no longer exists");
        self.delete(item).await?;
        self.commands.send(Command::DisplayMessage {
            message: Message::FileNotFound,
        });
        Ok(())
    }
}

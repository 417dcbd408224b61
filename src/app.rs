//! Application root for the downloads feature.
//!
//! Builds the database, repository, view-model and the single
//! [`FileDownloadCallback`] once; everything else borrows from here.

use std::sync::Arc;

use tracing::info;

use crate::managers::download_callback::FileDownloadCallback;
use crate::database::connection::Database;
use crate::services::file_system::{FileSystem, LocalFileSystem};
use crate::repository::{DownloadsRepository, SqliteDownloadsRepository};
use crate::types::errors::DownloadsError;
use crate::types::settings::DownloadsSettings;
use crate::managers::downloads_view_model::DownloadsViewModel;

/// Owns every long-lived component of the downloads feature.
pub struct App {
    pub db: Arc<Database>,
    pub repository: Arc<dyn DownloadsRepository>,
    pub view_model: DownloadsViewModel,
    pub download_callback: Arc<FileDownloadCallback>,
}

impl App {
    /// Opens the database named in `settings` and wires up the feature.
    pub fn new(settings: &DownloadsSettings) -> Result<Self, DownloadsError> {
        let db = Arc::new(Database::open(&settings.database_path)?);
        info!(path = %settings.database_path, "downloads database opened");
        Self::with_database(db, Arc::new(LocalFileSystem))
    }

    /// Wires the feature over an already opened database and filesystem.
    pub fn with_database(db: Arc<Database>, files: Arc<dyn FileSystem>) -> Result<Self, DownloadsError> {
        let repository: Arc<dyn DownloadsRepository> =
            Arc::new(SqliteDownloadsRepository::new(db.clone())?);
        let view_model = DownloadsViewModel::new(repository.clone(), files);
        let download_callback = Arc::new(FileDownloadCallback::new(repository.clone()));

        Ok(Self {
            db,
            repository,
            view_model,
            download_callback,
        })
    }
}

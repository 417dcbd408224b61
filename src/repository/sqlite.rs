//! SQLite-backed [`DownloadsRepository`].

use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::DownloadsRepository;
use crate::database::connection::Database;
use crate::types::download::{DownloadItem, DownloadStatus};
use crate::types::errors::DownloadsError;

const SELECT_COLUMNS: &str =
    "SELECT download_id, file_name, file_path, content_length, created_at, download_status FROM downloads";

/// Repository over the `downloads` table that republishes the full list on
/// a watch channel after each write.
pub struct SqliteDownloadsRepository {
    db: Arc<Database>,
    changes: watch::Sender<Vec<DownloadItem>>,
}

impl SqliteDownloadsRepository {
    pub fn new(db: Arc<Database>) -> Result<Self, DownloadsError> {
        let initial = Self::query_all(&db.connection())?;
        let (changes, _) = watch::channel(initial);
        Ok(Self { db, changes })
    }

    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<DownloadItem> {
        let content_length: i64 = row.get(3)?;
        let status: String = row.get(5)?;
        Ok(DownloadItem {
            download_id: row.get(0)?,
            file_name: row.get(1)?,
            file_path: row.get(2)?,
            content_length: u64::try_from(content_length)
                .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(3, content_length))?,
            created_at: row.get(4)?,
            download_status: DownloadStatus::from_db(&status).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    5,
                    rusqlite::types::Type::Text,
                    format!("unknown download status '{}'", status).into(),
                )
            })?,
        })
    }

    /// SQLite integers are signed; lengths past `i64::MAX` are rejected.
    fn stored_length(content_length: u64) -> Result<i64, DownloadsError> {
        i64::try_from(content_length).map_err(|_| DownloadsError::ContentLengthOutOfRange(content_length))
    }

    fn query_all(conn: &Connection) -> Result<Vec<DownloadItem>, DownloadsError> {
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY created_at DESC, download_id DESC",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::row_to_item)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    fn upsert(conn: &Connection, item: &DownloadItem) -> Result<(), DownloadsError> {
        let content_length = Self::stored_length(item.content_length)?;
        conn.execute(
            "INSERT OR REPLACE INTO downloads (download_id, file_name, file_path, content_length, created_at, download_status) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.download_id,
                item.file_name,
                item.file_path,
                content_length,
                item.created_at,
                item.download_status.as_str()
            ],
        )?;
        Ok(())
    }

    /// Re-reads the table and pushes it to subscribers.
    fn publish(&self, conn: &Connection) {
        match Self::query_all(conn) {
            Ok(items) => {
                self.changes.send_replace(items);
            }
            Err(e) => warn!(error = %e, "failed to refresh downloads after write"),
        }
    }
}

impl DownloadsRepository for SqliteDownloadsRepository {
    fn get_downloads(&self) -> Result<Vec<DownloadItem>, DownloadsError> {
        Self::query_all(&self.db.connection())
    }

    fn subscribe(&self) -> watch::Receiver<Vec<DownloadItem>> {
        self.changes.subscribe()
    }

    fn get_download_item(&self, download_id: i64) -> Result<Option<DownloadItem>, DownloadsError> {
        let conn = self.db.connection();
        let item = conn
            .query_row(
                &format!("{} WHERE download_id = ?1", SELECT_COLUMNS),
                params![download_id],
                Self::row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    fn insert(&self, item: &DownloadItem) -> Result<(), DownloadsError> {
        let conn = self.db.connection();
        Self::upsert(&conn, item)?;
        debug!(download_id = item.download_id, "download record inserted");
        self.publish(&conn);
        Ok(())
    }

    fn insert_all(&self, items: &[DownloadItem]) -> Result<(), DownloadsError> {
        let mut conn = self.db.connection();
        let tx = conn.transaction()?;
        for item in items {
            Self::upsert(&tx, item)?;
        }
        tx.commit()?;
        debug!(count = items.len(), "download records inserted");
        self.publish(&conn);
        Ok(())
    }

    fn update(
        &self,
        download_id: i64,
        status: DownloadStatus,
        content_length: u64,
    ) -> Result<(), DownloadsError> {
        let stored = Self::stored_length(content_length)?;
        let conn = self.db.connection();
        let affected = conn.execute(
            "UPDATE downloads SET download_status = ?1, content_length = ?2 WHERE download_id = ?3",
            params![status.as_str(), stored, download_id],
        )?;
        if affected == 0 {
            return Err(DownloadsError::NotFound(download_id));
        }
        self.publish(&conn);
        Ok(())
    }

    fn delete(&self, download_id: i64) -> Result<(), DownloadsError> {
        let conn = self.db.connection();
        let affected = conn.execute(
            "DELETE FROM downloads WHERE download_id = ?1",
            params![download_id],
        )?;
        if affected == 0 {
            debug!(download_id, "delete of unknown download record ignored");
            return Ok(());
        }
        self.publish(&conn);
        Ok(())
    }

    fn delete_all(&self) -> Result<(), DownloadsError> {
        let conn = self.db.connection();
        conn.execute("DELETE FROM downloads", [])?;
        self.publish(&conn);
        Ok(())
    }

    fn take_all(&self) -> Result<Vec<DownloadItem>, DownloadsError> {
        let mut conn = self.db.connection();
        let tx = conn.transaction()?;
        let items = Self::query_all(&tx)?;
        tx.execute("DELETE FROM downloads", [])?;
        tx.commit()?;
        debug!(count = items.len(), "download records taken");
        self.publish(&conn);
        Ok(items)
    }
}

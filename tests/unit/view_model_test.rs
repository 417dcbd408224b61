//! Unit tests for the DownloadsViewModel.
//!
//! Each test wires a view-model over an in-memory database and real files in a
//! temp directory, then checks repository state, files on disk, and the
//! commands delivered to the view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gitbrowser_downloads::database::Database;
use gitbrowser_downloads::managers::downloads_view_model::DownloadsViewModel;
use gitbrowser_downloads::repository::{DownloadsRepository, SqliteDownloadsRepository};
use gitbrowser_downloads::services::file_system::LocalFileSystem;
use gitbrowser_downloads::types::command::{Command, DismissReason, Message};
use gitbrowser_downloads::types::download::{DownloadItem, DownloadStatus};
use gitbrowser_downloads::types::errors::DownloadsError;
use gitbrowser_downloads::types::view_item::DownloadViewItem;
use tempfile::TempDir;
use tokio::sync::watch;

struct Fixture {
    repository: Arc<dyn DownloadsRepository>,
    view_model: DownloadsViewModel,
    dir: TempDir,
}

fn setup() -> Fixture {
    let db = Arc::new(Database::open_in_memory().expect("Failed to open in-memory database"));
    let repository: Arc<dyn DownloadsRepository> =
        Arc::new(SqliteDownloadsRepository::new(db).expect("repository"));
    let view_model = DownloadsViewModel::new(repository.clone(), Arc::new(LocalFileSystem));
    Fixture {
        repository,
        view_model,
        dir: TempDir::new().expect("temp dir"),
    }
}

impl Fixture {
    /// Inserts a finished record whose file exists on disk.
    fn downloaded(&self, id: i64, created_at: i64) -> DownloadItem {
        let path = self.dir.path().join(format!("file-{}.bin", id));
        std::fs::write(&path, b"payload").unwrap();
        let item = DownloadItem {
            download_id: id,
            file_name: format!("file-{}.bin", id),
            file_path: path.to_string_lossy().to_string(),
            content_length: 7,
            created_at,
            download_status: DownloadStatus::Finished,
        };
        self.repository.insert(&item).unwrap();
        item
    }

    fn ids(&self) -> Vec<i64> {
        self.repository
            .get_downloads()
            .unwrap()
            .iter()
            .map(|d| d.download_id)
            .collect()
    }
}

fn file_exists(item: &DownloadItem) -> bool {
    std::path::Path::new(&item.file_path).exists()
}

fn item_ids(view_items: &[DownloadViewItem]) -> Vec<i64> {
    view_items
        .iter()
        .filter_map(|v| match v {
            DownloadViewItem::Item { item } => Some(item.download_id),
            _ => None,
        })
        .collect()
}

// ─── downloads() ───

#[tokio::test]
async fn test_downloads_starts_with_empty_marker() {
    let fx = setup();
    let rx = fx.view_model.downloads();
    assert_eq!(*rx.borrow(), vec![DownloadViewItem::Empty]);
}

#[tokio::test]
async fn test_deleted_item_disappears_from_downloads() {
    let fx = setup();
    let a = fx.downloaded(1, 1_700_000_000_000);
    fx.downloaded(2, 1_700_000_100_000);

    let mut rx = fx.view_model.downloads();
    assert_eq!(item_ids(&rx.borrow_and_update()), vec![2, 1]);

    fx.view_model.on_delete_item_clicked(a).await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("view state should update")
        .unwrap();
    assert_eq!(item_ids(&rx.borrow_and_update()), vec![2]);
}

// ─── Single delete + undo window ───

#[tokio::test]
async fn test_delete_item_offers_undo_and_keeps_file() {
    let fx = setup();
    let item = fx.downloaded(1, 1_000);
    let commands = fx.view_model.commands();

    fx.view_model.on_delete_item_clicked(item.clone()).await.unwrap();

    assert!(fx.ids().is_empty());
    assert!(file_exists(&item), "file must survive until the undo window closes");
    assert_eq!(
        commands.try_recv(),
        Some(Command::DisplayUndoMessage {
            message: Message::DownloadDeleted {
                file_name: "file-1.bin".to_string()
            },
            items: vec![item],
        })
    );
}

#[tokio::test]
async fn test_undo_action_reinserts_and_keeps_file() {
    let fx = setup();
    let item = fx.downloaded(1, 1_000);
    fx.view_model.on_delete_item_clicked(item.clone()).await.unwrap();

    fx.view_model
        .on_undo_message_dismissed(vec![item.clone()], DismissReason::Action)
        .await
        .unwrap();

    assert_eq!(fx.repository.get_download_item(1).unwrap(), Some(item.clone()));
    assert!(file_exists(&item));
}

#[tokio::test]
async fn test_dismissal_without_undo_deletes_file() {
    for reason in [
        DismissReason::Swipe,
        DismissReason::Timeout,
        DismissReason::Manual,
        DismissReason::Consecutive,
    ] {
        let fx = setup();
        let item = fx.downloaded(1, 1_000);
        fx.view_model.on_delete_item_clicked(item.clone()).await.unwrap();

        fx.view_model
            .on_undo_message_dismissed(vec![item.clone()], reason)
            .await
            .unwrap();

        assert!(fx.ids().is_empty(), "{:?}", reason);
        assert!(!file_exists(&item), "file should be gone after {:?}", reason);
    }
}

// ─── Delete all ───

#[tokio::test]
async fn test_delete_all_clears_records_and_offers_undo() {
    let fx = setup();
    let a = fx.downloaded(1, 1_000);
    let b = fx.downloaded(2, 2_000);
    let commands = fx.view_model.commands();

    fx.view_model.delete_all_downloaded_items().await.unwrap();

    assert!(fx.ids().is_empty());
    assert!(file_exists(&a) && file_exists(&b));
    match commands.try_recv() {
        Some(Command::DisplayUndoMessage { message, items }) => {
            assert_eq!(message, Message::AllDownloadsDeleted);
            assert_eq!(items, vec![b, a]);
        }
        other => panic!("expected undo message, got {:?}", other),
    }
}

#[tokio::test]
async fn test_undo_delete_all_restores_original_attributes() {
    let fx = setup();
    fx.downloaded(1, 1_000);
    fx.downloaded(2, 2_000);
    let before = fx.repository.get_downloads().unwrap();
    let commands = fx.view_model.commands();

    fx.view_model.delete_all_downloaded_items().await.unwrap();
    let Some(Command::DisplayUndoMessage { items, .. }) = commands.try_recv() else {
        panic!("expected undo message");
    };
    fx.view_model
        .on_undo_message_dismissed(items, DismissReason::Action)
        .await
        .unwrap();

    assert_eq!(fx.repository.get_downloads().unwrap(), before);
}

#[tokio::test]
async fn test_delete_all_on_empty_store_still_notifies() {
    let fx = setup();
    let commands = fx.view_model.commands();

    fx.view_model.delete_all_downloaded_items().await.unwrap();

    assert_eq!(
        commands.try_recv(),
        Some(Command::DisplayUndoMessage {
            message: Message::AllDownloadsDeleted,
            items: vec![],
        })
    );
}

/// Repository whose first bulk read lets a download engine write slip in,
/// once right after a plain read and once right before an atomic take.
struct ConcurrentStartRepository {
    inner: SqliteDownloadsRepository,
    started: DownloadItem,
    fired: AtomicBool,
}

impl ConcurrentStartRepository {
    fn engine_starts_download(&self) {
        if !self.fired.swap(true, Ordering::SeqCst) {
            self.inner.insert(&self.started).unwrap();
        }
    }
}

impl DownloadsRepository for ConcurrentStartRepository {
    fn get_downloads(&self) -> Result<Vec<DownloadItem>, DownloadsError> {
        let items = self.inner.get_downloads()?;
        self.engine_starts_download();
        Ok(items)
    }
    fn subscribe(&self) -> watch::Receiver<Vec<DownloadItem>> {
        self.inner.subscribe()
    }
    fn get_download_item(&self, download_id: i64) -> Result<Option<DownloadItem>, DownloadsError> {
        self.inner.get_download_item(download_id)
    }
    fn insert(&self, item: &DownloadItem) -> Result<(), DownloadsError> {
        self.inner.insert(item)
    }
    fn insert_all(&self, items: &[DownloadItem]) -> Result<(), DownloadsError> {
        self.inner.insert_all(items)
    }
    fn update(&self, download_id: i64, status: DownloadStatus, content_length: u64) -> Result<(), DownloadsError> {
        self.inner.update(download_id, status, content_length)
    }
    fn delete(&self, download_id: i64) -> Result<(), DownloadsError> {
        self.inner.delete(download_id)
    }
    fn delete_all(&self) -> Result<(), DownloadsError> {
        self.inner.delete_all()
    }
    fn take_all(&self) -> Result<Vec<DownloadItem>, DownloadsError> {
        self.engine_starts_download();
        self.inner.take_all()
    }
}

#[tokio::test]
async fn test_undo_delete_all_restores_download_started_during_clear() {
    let db = Arc::new(Database::open_in_memory().expect("Failed to open in-memory database"));
    let inner = SqliteDownloadsRepository::new(db).expect("repository");
    inner.insert(&DownloadItem::started(1, "a.bin", "/d/a.bin")).unwrap();
    let repository = Arc::new(ConcurrentStartRepository {
        inner,
        started: DownloadItem::started(99, "late.bin", "/d/late.bin"),
        fired: AtomicBool::new(false),
    });
    let view_model = DownloadsViewModel::new(repository.clone(), Arc::new(LocalFileSystem));
    let commands = view_model.commands();

    view_model.delete_all_downloaded_items().await.unwrap();
    let Some(Command::DisplayUndoMessage { items, .. }) = commands.try_recv() else {
        panic!("expected undo message");
    };
    let mut undo_ids: Vec<i64> = items.iter().map(|d| d.download_id).collect();
    undo_ids.sort();
    assert_eq!(undo_ids, vec![1, 99]);

    view_model
        .on_undo_message_dismissed(items, DismissReason::Action)
        .await
        .unwrap();

    assert!(repository.get_download_item(1).unwrap().is_some());
    assert!(repository.get_download_item(99).unwrap().is_some());
}

// ─── Open / share ───

#[tokio::test]
async fn test_click_existing_file_opens_it() {
    let fx = setup();
    let item = fx.downloaded(1, 1_000);
    let commands = fx.view_model.commands();

    fx.view_model.on_item_clicked(item.clone()).await.unwrap();

    assert_eq!(commands.try_recv(), Some(Command::OpenFile { item }));
    assert_eq!(fx.ids(), vec![1]);
}

#[tokio::test]
async fn test_share_existing_file_shares_it() {
    let fx = setup();
    let item = fx.downloaded(1, 1_000);
    let commands = fx.view_model.commands();

    fx.view_model.on_share_item_clicked(item.clone()).await.unwrap();

    assert_eq!(commands.try_recv(), Some(Command::ShareFile { item }));
}

#[tokio::test]
async fn test_click_missing_file_removes_record_and_reports() {
    let fx = setup();
    let item = fx.downloaded(1, 1_000);
    std::fs::remove_file(&item.file_path).unwrap();
    let commands = fx.view_model.commands();

    fx.view_model.on_item_clicked(item).await.unwrap();

    assert!(fx.ids().is_empty());
    assert_eq!(
        commands.try_recv(),
        Some(Command::DisplayMessage {
            message: Message::FileNotFound
        })
    );
}

#[tokio::test]
async fn test_share_missing_file_removes_record_and_reports() {
    let fx = setup();
    let item = fx.downloaded(1, 1_000);
    std::fs::remove_file(&item.file_path).unwrap();
    let commands = fx.view_model.commands();

    fx.view_model.on_share_item_clicked(item).await.unwrap();

    assert!(fx.ids().is_empty());
    assert_eq!(
        commands.try_recv(),
        Some(Command::DisplayMessage {
            message: Message::FileNotFound
        })
    );
}

// ─── Command delivery ───

#[tokio::test]
async fn test_unconsumed_command_is_replaced_by_newer_one() {
    let fx = setup();
    let a = fx.downloaded(1, 1_000);
    let b = fx.downloaded(2, 2_000);
    let commands = fx.view_model.commands();

    fx.view_model.on_item_clicked(a).await.unwrap();
    fx.view_model.on_share_item_clicked(b.clone()).await.unwrap();

    assert_eq!(commands.try_recv(), Some(Command::ShareFile { item: b }));
    assert_eq!(commands.try_recv(), None);
}

// ─── Direct operations ───

#[tokio::test]
async fn test_delete_files_from_disk_ignores_already_missing_files() {
    let fx = setup();
    let a = fx.downloaded(1, 1_000);
    let b = fx.downloaded(2, 2_000);
    std::fs::remove_file(&a.file_path).unwrap();

    fx.view_model
        .delete_files_from_disk(vec![a, b.clone()])
        .await
        .unwrap();

    assert!(!file_exists(&b));
}

#[tokio::test]
async fn test_delete_then_insert_round_trips_record() {
    let fx = setup();
    let item = fx.downloaded(3, 3_000);

    fx.view_model.delete(&item).await.unwrap();
    assert!(fx.ids().is_empty());

    fx.view_model.insert(vec![item.clone()]).await.unwrap();
    assert_eq!(fx.repository.get_download_item(3).unwrap(), Some(item));
}

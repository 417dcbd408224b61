use std::fmt;

use serde::{Deserialize, Serialize};

use super::download::DownloadItem;

/// User-facing notification texts. The host may localize them; `Display`
/// gives the English wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    FileNotFound,
    DownloadDeleted { file_name: String },
    AllDownloadsDeleted,
    DownloadStarted,
    DownloadFailed,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::FileNotFound => write!(f, "File no longer exists"),
            Message::DownloadDeleted { file_name } => write!(f, "Deleted {}", file_name),
            Message::AllDownloadsDeleted => write!(f, "All downloads deleted"),
            Message::DownloadStarted => write!(f, "Download started"),
            Message::DownloadFailed => write!(f, "Download failed"),
        }
    }
}

/// One-shot directive from the downloads view-model to the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    OpenFile { item: DownloadItem },
    ShareFile { item: DownloadItem },
    DisplayMessage { message: Message },
    /// Carries the removed records so the undo action can reinsert them.
    DisplayUndoMessage {
        message: Message,
        items: Vec<DownloadItem>,
    },
}

/// One-shot notification from the download callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DownloadCommand {
    ShowDownloadStartedMessage,
    ShowDownloadSuccessMessage { file_name: String, file_path: String },
    ShowDownloadFailedMessage,
}

/// Why a transient undo notification went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissReason {
    /// The user pressed the undo action.
    Action,
    Swipe,
    Timeout,
    /// Dismissed programmatically by the host.
    Manual,
    /// Replaced by a newer notification.
    Consecutive,
}

impl DismissReason {
    pub fn is_undo(&self) -> bool {
        matches!(self, DismissReason::Action)
    }
}

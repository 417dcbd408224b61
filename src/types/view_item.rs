use serde::Serialize;

use super::download::DownloadItem;

/// A row of the downloads list. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloadViewItem {
    /// Placeholder shown when there are no downloads at all.
    Empty,
    /// Day separator, labelled `YYYY-MM-DD`.
    Header { date_label: String },
    Item { item: DownloadItem },
}

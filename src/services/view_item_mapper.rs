//! Projection of download records into the grouped rows of the downloads list.

use chrono::{Local, LocalResult, TimeZone};
use tracing::warn;

use crate::types::download::DownloadItem;
use crate::types::view_item::DownloadViewItem;

/// Groups newest-first records by calendar day in the local time zone.
///
/// An empty list maps to a single [`DownloadViewItem::Empty`].
pub fn to_view_items(items: &[DownloadItem]) -> Vec<DownloadViewItem> {
    to_view_items_in(items, &Local)
}

/// Same as [`to_view_items`] with an explicit time zone.
///
/// A header is emitted whenever the day label differs from the previous
/// item's; input order is kept as is.
pub fn to_view_items_in<Tz: TimeZone>(items: &[DownloadItem], tz: &Tz) -> Vec<DownloadViewItem> {
    if items.is_empty() {
        return vec![DownloadViewItem::Empty];
    }

    let mut view_items = Vec::with_capacity(items.len() * 2);
    let mut previous_label: Option<String> = None;
    for item in items {
        let label = day_label(item.created_at, tz);
        if previous_label.as_deref() != Some(label.as_str()) {
            view_items.push(DownloadViewItem::Header {
                date_label: label.clone(),
            });
            previous_label = Some(label);
        }
        view_items.push(DownloadViewItem::Item { item: item.clone() });
    }
    view_items
}

/// Header label for timestamps chrono cannot represent.
pub const UNKNOWN_DAY_LABEL: &str = "Unknown date";

/// `YYYY-MM-DD` of an epoch-millisecond timestamp in `tz`, or
/// [`UNKNOWN_DAY_LABEL`] when it is out of range.
pub fn day_label<Tz: TimeZone>(created_at_millis: i64, tz: &Tz) -> String {
    match tz.timestamp_millis_opt(created_at_millis) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
            dt.date_naive().format("%Y-%m-%d").to_string()
        }
        LocalResult::None => {
            warn!(created_at = created_at_millis, "download timestamp out of range");
            UNKNOWN_DAY_LABEL.to_string()
        }
    }
}

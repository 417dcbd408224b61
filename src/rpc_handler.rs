//! RPC method handler for the downloads JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested. `handle_method`
//! dispatches calls to the view-model and the download callback held by
//! [`App`]; the `render_*` functions turn view state and commands into the
//! JSON the host UI draws.

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::download_callback::DownloadCallback;
use crate::services::view_item_mapper;
use crate::types::command::{Command, DismissReason, DownloadCommand, Message};
use crate::types::download::DownloadItem;
use crate::types::view_item::DownloadViewItem;

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
/// Commands produced by an action are delivered on the command receivers,
/// not in the response.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Downloads screen ───
        "downloads.list" => {
            let repository = app.repository.clone();
            let items = tokio::task::spawn_blocking(move || repository.get_downloads())
                .await
                .map_err(|e| e.to_string())?
                .map_err(|e| e.to_string())?;
            let rows: Vec<Value> = view_item_mapper::to_view_items(&items)
                .iter()
                .map(render_view_item)
                .collect();
            Ok(json!(rows))
        }
        "downloads.open" => {
            let item = lookup(app, params).await?;
            app.view_model.on_item_clicked(item).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "downloads.share" => {
            let item = lookup(app, params).await?;
            app.view_model
                .on_share_item_clicked(item)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "downloads.delete" => {
            let item = lookup(app, params).await?;
            app.view_model
                .on_delete_item_clicked(item)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "downloads.delete_all" => {
            app.view_model
                .delete_all_downloaded_items()
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "downloads.dismiss" => {
            let items: Vec<DownloadItem> = params
                .get("items")
                .cloned()
                .ok_or("missing items")
                .and_then(|v| serde_json::from_value(v).map_err(|_| "invalid items"))?;
            let reason: DismissReason = params
                .get("reason")
                .cloned()
                .ok_or("missing reason")
                .and_then(|v| serde_json::from_value(v).map_err(|_| "invalid reason"))?;
            app.view_model
                .on_undo_message_dismissed(items, reason)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Download engine callbacks ───
        "download.start" => {
            let download_id = download_id(params)?;
            let file_name = params.get("file_name").and_then(|v| v.as_str()).ok_or("missing file_name")?;
            let file_path = params.get("file_path").and_then(|v| v.as_str()).ok_or("missing file_path")?;
            let item = DownloadItem::started(download_id, file_name, file_path);
            let callback = app.download_callback.clone();
            tokio::task::spawn_blocking(move || callback.on_start(item))
                .await
                .map_err(|e| e.to_string())?
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "download.success" => {
            let download_id = download_id(params)?;
            let content_length = params
                .get("content_length")
                .and_then(|v| v.as_u64())
                .ok_or("missing content_length")?;
            let callback = app.download_callback.clone();
            tokio::task::spawn_blocking(move || callback.on_success(download_id, content_length))
                .await
                .map_err(|e| e.to_string())?
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "download.failure" => {
            let download_id = download_id(params)?;
            app.download_callback.on_failure(download_id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

fn download_id(params: &Value) -> Result<i64, String> {
    params
        .get("download_id")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| "missing download_id".to_string())
}

async fn lookup(app: &App, params: &Value) -> Result<DownloadItem, String> {
    let id = download_id(params)?;
    let repository = app.repository.clone();
    tokio::task::spawn_blocking(move || repository.get_download_item(id))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("download not found: {}", id))
}

/// JSON row for one entry of the downloads list.
pub fn render_view_item(view_item: &DownloadViewItem) -> Value {
    match view_item {
        DownloadViewItem::Empty => json!({"type": "empty"}),
        DownloadViewItem::Header { date_label } => json!({"type": "header", "date_label": date_label}),
        DownloadViewItem::Item { item } => json!({
            "type": "item",
            "download_id": item.download_id,
            "file_name": item.file_name,
            "file_path": item.file_path,
            "content_length": item.content_length,
            "created_at": item.created_at,
            "status": item.download_status.as_str(),
        }),
    }
}

/// JSON event for a view-model command.
pub fn render_command(command: &Command) -> Value {
    match command {
        Command::OpenFile { item } => json!({"command": "open_file", "file_path": item.file_path}),
        Command::ShareFile { item } => json!({"command": "share_file", "file_path": item.file_path}),
        Command::DisplayMessage { message } => json!({
            "command": "display_message",
            "text": message.to_string(),
        }),
        Command::DisplayUndoMessage { message, items } => json!({
            "command": "display_undo_message",
            "text": message.to_string(),
            "items": items,
        }),
    }
}

/// JSON event for a download lifecycle notification.
pub fn render_download_command(command: &DownloadCommand) -> Value {
    match command {
        DownloadCommand::ShowDownloadSuccessMessage { file_name, file_path } => json!({
            "command": "show_download_success",
            "file_name": file_name,
            "file_path": file_path,
        }),
        DownloadCommand::ShowDownloadStartedMessage => json!({
            "command": "show_download_started",
            "text": Message::DownloadStarted.to_string(),
        }),
        DownloadCommand::ShowDownloadFailedMessage => json!({
            "command": "show_download_failed",
            "text": Message::DownloadFailed.to_string(),
        }),
    }
}

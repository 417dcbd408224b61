//! Downloads RPC server — JSON-RPC over stdin/stdout for the browser shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"downloads.delete", "params":{"download_id":7}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Events:   {"event":"downloads","items":[...]}, {"event":"command",...},
//!           {"event":"download_command",...}
//!
//! Logs go to stderr so stdout carries only protocol lines.

use std::io::{self, Write};
use std::process::ExitCode;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gitbrowser_downloads::app::App;
use gitbrowser_downloads::rpc_handler::{
    handle_method, render_command, render_download_command, render_view_item,
};
use gitbrowser_downloads::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

fn emit(value: &Value) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{}", value);
    let _ = out.flush();
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut settings_engine = SettingsEngine::new(None);
    let settings_result = settings_engine.load();
    let settings = settings_engine.get_settings().clone();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = settings_result {
        error!(error = %e, path = %settings_engine.get_config_path().display(), "settings unreadable, using defaults");
    }

    let app = match App::new(&settings) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "failed to initialize downloads");
            return ExitCode::FAILURE;
        }
    };

    let mut view_state = app.view_model.downloads();
    tokio::spawn(async move {
        loop {
            let rows: Vec<Value> = view_state.borrow_and_update().iter().map(render_view_item).collect();
            emit(&json!({"event": "downloads", "items": rows}));
            if view_state.changed().await.is_err() {
                break;
            }
        }
    });

    let commands = app.view_model.commands();
    tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            let mut event = render_command(&command);
            event["event"] = json!("command");
            emit(&event);
        }
    });

    let download_commands = app.download_callback.commands();
    tokio::spawn(async move {
        while let Some(command) = download_commands.recv().await {
            let mut event = render_download_command(&command);
            event["event"] = json!("download_command");
            emit(&event);
        }
    });

    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));
    info!("downloads rpc server ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        emit(&response);
    }

    info!("stdin closed, shutting down");
    ExitCode::SUCCESS
}

// Platform paths for the downloads feature.
//
// `GITBROWSER_CONFIG_DIR` / `GITBROWSER_DATA_DIR` take precedence; otherwise the
// per-OS convention is used, with a `downloads` subdirectory under the browser's
// own directory.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
const APP_DIR: &str = "gitbrowser";
const FEATURE_DIR: &str = "downloads";

fn home_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    let var = "USERPROFILE";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";
    PathBuf::from(env::var(var).unwrap_or_else(|_| String::from(".")))
}

/// Returns the configuration directory.
///
/// - **Linux**: `$XDG_CONFIG_HOME/gitbrowser/downloads` or `~/.config/gitbrowser/downloads`
/// - **macOS**: `~/Library/Application Support/GitBrowser/downloads`
/// - **Windows**: `%APPDATA%/GitBrowser/downloads`
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var("GITBROWSER_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    base_dir("XDG_CONFIG_HOME", &[".config"]).join(FEATURE_DIR)
}

/// Returns the data directory, where the downloads database lives.
///
/// - **Linux**: `$XDG_DATA_HOME/gitbrowser/downloads` or `~/.local/share/gitbrowser/downloads`
/// - **macOS**: `~/Library/Application Support/GitBrowser/downloads`
/// - **Windows**: `%APPDATA%/GitBrowser/downloads`
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("GITBROWSER_DATA_DIR") {
        return PathBuf::from(dir);
    }
    base_dir("XDG_DATA_HOME", &[".local", "share"]).join(FEATURE_DIR)
}

#[cfg(target_os = "linux")]
fn base_dir(xdg_var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(xdg_var) {
        Ok(xdg) => PathBuf::from(xdg).join(APP_DIR),
        Err(_) => fallback
            .iter()
            .fold(home_dir(), |p, seg| p.join(seg))
            .join(APP_DIR),
    }
}

#[cfg(target_os = "macos")]
fn base_dir(_xdg_var: &str, _fallback: &[&str]) -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("GitBrowser")
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn base_dir(_xdg_var: &str, _fallback: &[&str]) -> PathBuf {
    match env::var("APPDATA") {
        Ok(appdata) => PathBuf::from(appdata).join("GitBrowser"),
        Err(_) => home_dir().join("AppData").join("Roaming").join("GitBrowser"),
    }
}

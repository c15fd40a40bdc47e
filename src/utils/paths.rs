//! Cross-platform path utilities for the ledger and its config

use std::path::{Path, PathBuf};

/// Default ledger location, before `~` expansion
pub const DEFAULT_LEDGER: &str = "~/.timetrack";

/// Get home directory
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Default config file: `<config_dir>/timetrack/config.toml`
///
/// `~/.config` on Linux, `~/Library/Application Support` on macOS,
/// `%APPDATA%` on Windows.
pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("timetrack").join("config.toml"))
}

/// Replace a leading `~` with the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

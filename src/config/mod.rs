//! Configuration module for mention-search
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use std::path::PathBuf;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "MENTION_SEARCH_SETTINGS_PATH";

/// Locate the settings file, if any
///
/// An explicit path from the environment wins; otherwise the first existing
/// file among the default locations is used.
pub fn find_settings_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(SETTINGS_PATH_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/mention-search/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("mention-search/settings.yml"));
    }

    paths.into_iter().find(|path| path.exists())
}

// Resolves where the optional settings file lives.

use colored::Colorize;
use std::path::PathBuf;

use crate::libs::utilities::path_helpers::{app_dir, expand_path};
use crate::log_debug;

/// `--config` / `DEV_INSTALL_CONFIG` when given, else `~/.dev-install/config.yaml`.
pub fn resolve_config_path(config_path: Option<&str>) -> PathBuf {
    let resolved = match config_path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => expand_path(path),
        None => app_dir().join("config.yaml"),
    };
    log_debug!("[Paths] Config path resolved to {}", resolved.display().to_string().yellow());
    resolved
}

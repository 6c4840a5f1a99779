use std::path::PathBuf;

use crate::log_debug;

/// Expands `~` and environment variables (`$HOME`, `${XDG_CONFIG_HOME}`) in a
/// configured path.
///
/// Unknown variables leave the input untouched rather than failing; the path
/// is then used literally and any problem surfaces when it is opened.
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            log_debug!("[Utils] Could not expand '{}': {}. Using it verbatim.", path, e);
            PathBuf::from(shellexpand::tilde(path).as_ref())
        }
    }
}

/// `~/.dev-install`, or `./.dev-install` when no home directory is known.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dev-install")
}

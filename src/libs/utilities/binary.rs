// Helpers for placing downloaded binaries into a user-owned bin directory.

use colored::Colorize;
use std::fs;
use std::io;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::{log_debug, log_warn};

/// Finds the first regular file called `file_name` (case-insensitive) below
/// `dir`. Release archives nest the binary at different depths
/// (`pandoc-3.7/bin/pandoc`, `pandoc-3.7/pandoc.exe`), so the whole tree is
/// searched.
pub fn find_binary_named(dir: &Path, file_name: &str) -> Option<PathBuf> {
    log_debug!(
        "[Utils] Searching for '{}' in: {}",
        file_name,
        dir.display().to_string().yellow()
    );
    let found = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .find(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(file_name))
        })
        .map(|e| e.into_path());
    if found.is_none() {
        log_warn!("[Utils] '{}' not found under {}", file_name, dir.display());
    }
    found
}

/// Moves `from` to `to`, creating parent directories. Falls back to
/// copy + remove when the two paths are on different filesystems (the temp
/// dir is often a tmpfs).
pub fn move_and_rename_binary(from: &Path, to: &Path) -> io::Result<()> {
    log_debug!(
        "[Utils] Moving binary from {} to {}",
        from.display().to_string().yellow(),
        to.display().to_string().cyan()
    );

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log_debug!("[Utils] Cross-device move, copying instead: {}", e);
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

/// `chmod 755`.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

// Windows decides executability by extension.
#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

// Idempotent PATH configuration in the user's shell profiles.
//
// Installers that drop binaries outside the default PATH (Go's /usr/local/go/bin,
// the user bin dir on Git Bash) append an `export PATH=...` line here. A line
// that is already present is never written twice, so re-running an installer
// leaves the profiles unchanged.

use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::{log_debug, log_info};

const HEADER: &str = "# Added by dev install";

/// `export PATH="$PATH:<dir>"`
pub fn path_export(dir: &str) -> String {
    format!("export PATH=\"$PATH:{dir}\"")
}

/// Makes sure every line in `lines` is present in the chosen profiles.
///
/// Only profiles that already exist are touched; when none of them exists the
/// first candidate is created. Returns the profiles that were modified.
pub fn ensure_lines(candidates: &[PathBuf], lines: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut targets: Vec<&PathBuf> = candidates.iter().filter(|p| p.is_file()).collect();
    if targets.is_empty() {
        match candidates.first() {
            Some(first) => targets.push(first),
            None => {
                log_debug!("[Shell Profile] No shell profiles configured; skipping PATH update.");
                return Ok(Vec::new());
            }
        }
    }

    let mut modified = Vec::new();
    for profile in targets {
        let existing = read_profile_lines(profile)?;
        let missing: Vec<String> = lines
            .iter()
            .filter(|line| !contains_line(&existing, line))
            .cloned()
            .collect();
        if missing.is_empty() {
            log_debug!(
                "[Shell Profile] {} already has the required PATH entries.",
                profile.display().to_string().dimmed()
            );
            continue;
        }
        append_to_profile(profile, &missing)?;
        log_info!(
            "Updated {} with PATH entries. Open a new terminal to pick them up.",
            profile.display().to_string().cyan()
        );
        modified.push(profile.clone());
    }
    Ok(modified)
}

fn read_profile_lines(path: &Path) -> io::Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents.lines().map(str::to_string).collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

// Trailing comments and indentation do not make a line different.
fn contains_line(haystack: &[String], needle: &str) -> bool {
    let needle = needle.trim();
    haystack.iter().any(|line| line.trim().starts_with(needle))
}

fn append_to_profile(path: &Path, lines: &[String]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "\n{HEADER}")?;
    for line in lines {
        writeln!(file, "{line}")?;
        log_debug!("[Shell Profile] Appended '{}' to {}", line.dimmed(), path.display());
    }
    Ok(())
}

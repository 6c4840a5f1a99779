//! # Settings Schema
//!
//! Optional user configuration, read from `~/.dev-install/config.yaml` (or the
//! path given with `--config`). Every field has a default, so an empty or
//! missing file behaves exactly like the built-in values.
//!
//! ```yaml
//! timeouts:
//!   default_secs: 300
//!   extended_secs: 1800
//! versions:
//!   go: "1.23.4"
//!   yq: "v4.44.6"
//! minimum_go_for_gitego: "1.24"
//! shell_profiles:
//!   - ~/.bashrc
//!   - ~/.zshrc
//! user_bin_dir: ~/bin
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timeouts: Timeouts,
    pub versions: ToolVersions,
    /// Minimum Go toolchain that can build gitego.
    pub minimum_go_for_gitego: String,
    /// Profiles that receive PATH exports. Only existing files are touched;
    /// when none exist the first entry is created.
    pub shell_profiles: Vec<String>,
    /// Per-user binary directory for installs that must not use sudo (Git Bash).
    pub user_bin_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            timeouts: Timeouts::default(),
            versions: ToolVersions::default(),
            minimum_go_for_gitego: "1.24".to_string(),
            shell_profiles: vec![
                "~/.bashrc".to_string(),
                "~/.profile".to_string(),
                "~/.zshrc".to_string(),
            ],
            user_bin_dir: "~/bin".to_string(),
        }
    }
}

/// Per-command deadlines, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Ordinary package-manager calls and downloads.
    pub default_secs: u64,
    /// Known-slow installers (Visual Studio Build Tools, Chocolatey bootstrap).
    pub extended_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            default_secs: 300,
            extended_secs: 1800,
        }
    }
}

impl Timeouts {
    pub fn default_timeout(&self) -> Option<Duration> {
        non_zero(self.default_secs)
    }

    pub fn extended_timeout(&self) -> Option<Duration> {
        non_zero(self.extended_secs)
    }
}

// 0 disables the deadline.
fn non_zero(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Pinned release versions used to build download URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolVersions {
    pub go: String,
    pub yq: String,
    pub jq: String,
    pub pandoc: String,
}

impl Default for ToolVersions {
    fn default() -> Self {
        ToolVersions {
            go: "1.24.4".to_string(),
            yq: "v4.45.4".to_string(),
            jq: "1.7.1".to_string(),
            pandoc: "3.7.0.2".to_string(),
        }
    }
}

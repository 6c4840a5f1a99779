use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schemas::settings::Settings;
use crate::{log_debug, log_info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not valid YAML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Loads settings from `path`.
///
/// A missing file is not an error: the built-in defaults are used. An empty
/// file also yields the defaults. A file that exists but cannot be read or
/// parsed is reported, since silently ignoring a typo would be surprising.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    log_debug!("[Config] Looking for settings at {}", path.display().to_string().blue());

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log_debug!("[Config] No config file found, using defaults.");
            return Ok(Settings::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings: Settings = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log_info!("Using configuration from {}", path.display().to_string().cyan());
    log_debug!("[Config] Loaded settings: {:?}", settings);
    Ok(settings)
}

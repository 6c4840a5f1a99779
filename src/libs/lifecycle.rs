//! # Install Lifecycle
//!
//! Every platform installer walks the same state machine:
//!
//! ```text
//! NotChecked ──present──▶ AlreadyInstalled
//!     │
//!     └─absent─▶ Installing ──ok + present──▶ Installed
//!                    │
//!                    └─error / still absent─▶ Failed
//! ```
//!
//! [`Steps`] implements it once so the per-tool modules only supply a
//! presence probe and the install step. Expected failures (missing
//! prerequisite, failing command, failed verification, ...) end in
//! [`InstallOutcome::Failed`]; only exceptional errors (a process that cannot
//! be spawned, an I/O error) are returned as `Err`.

use std::io;

use colored::Colorize;
use thiserror::Error;

use crate::libs::shell::ShellError;
use crate::schemas::command::{CommandResult, CommandSpec, InstallResult};
use crate::{log_debug, log_error, log_info};

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("{prerequisite} is required. {remediation}")]
    PrerequisiteMissing {
        prerequisite: String,
        remediation: String,
    },
    #[error("`{command}` failed:\n{output}")]
    CommandFailed { command: String, output: String },
    #[error("{tool} was installed but is still not available. {guidance}")]
    VerificationFailed { tool: String, guidance: String },
    #[error("{tool} has no release for the '{architecture}' architecture")]
    UnsupportedArchitecture { tool: String, architecture: String },
    #[error("download of {url} failed: {reason}")]
    DownloadFailed { url: String, reason: String },
    #[error(transparent)]
    Shell(#[from] ShellError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl InstallError {
    pub fn prerequisite(prerequisite: &str, remediation: &str) -> Self {
        InstallError::PrerequisiteMissing {
            prerequisite: prerequisite.to_string(),
            remediation: remediation.to_string(),
        }
    }

    pub fn command_failed(spec: &CommandSpec, result: &CommandResult) -> Self {
        InstallError::CommandFailed {
            command: spec.to_string(),
            output: result.combined_output(),
        }
    }

    pub fn adapter_failed(command: &str, result: &InstallResult) -> Self {
        InstallError::CommandFailed {
            command: command.to_string(),
            output: result.output.clone(),
        }
    }

    pub fn unsupported_architecture(tool: &str, architecture: &str) -> Self {
        InstallError::UnsupportedArchitecture {
            tool: tool.to_string(),
            architecture: architecture.to_string(),
        }
    }

    /// Expected failure modes are reported to the user and end the installer
    /// cleanly. The rest propagate to `main`.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, InstallError::Shell(_) | InstallError::Io(_))
    }
}

/// Terminal state of one `dev install <tool>` run.
#[derive(Debug)]
pub enum InstallOutcome {
    AlreadyInstalled,
    Installed,
    /// The tool has no installer for this platform. Not an error.
    NotAvailable,
    Failed(InstallError),
}

impl InstallOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, InstallOutcome::Failed(_))
    }
}

/// Drives the check → install → verify sequence for one tool.
pub struct Steps<'a> {
    tool: &'a str,
    guidance: String,
}

impl<'a> Steps<'a> {
    pub fn new(tool: &'a str) -> Self {
        Steps {
            tool,
            guidance: format!(
                "Open a new terminal (or source your shell profile) so PATH is refreshed, then run `dev install {tool}` again."
            ),
        }
    }

    /// Replaces the remediation text shown when verification fails.
    pub fn guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = guidance.into();
        self
    }

    pub fn run<P, I>(self, is_present: P, install: I) -> Result<InstallOutcome, InstallError>
    where
        P: Fn() -> bool,
        I: FnOnce() -> Result<(), InstallError>,
    {
        if is_present() {
            log_info!("{} is already installed.", self.tool.bold());
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        log_info!("Installing {}...", self.tool.bold());
        if let Err(err) = install() {
            return settle(self.tool, err);
        }

        if is_present() {
            log_info!("{} installed successfully.", self.tool.bold().green());
            Ok(InstallOutcome::Installed)
        } else {
            settle(
                self.tool,
                InstallError::VerificationFailed {
                    tool: self.tool.to_string(),
                    guidance: self.guidance,
                },
            )
        }
    }
}

// Reportable errors become a `Failed` outcome, everything else propagates.
fn settle(tool: &str, err: InstallError) -> Result<InstallOutcome, InstallError> {
    if err.is_reportable() {
        log_error!("Could not install {}: {}", tool.bold().red(), err);
        Ok(InstallOutcome::Failed(err))
    } else {
        log_debug!("[Lifecycle] Exceptional error while installing {}: {:?}", tool, err);
        Err(err)
    }
}

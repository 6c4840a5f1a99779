//! # Package-Manager Adapters
//!
//! One thin adapter per external package manager. Each wraps the manager's
//! CLI behind the [`PackageManager`] trait and parses its text output
//! defensively: a field that cannot be parsed becomes `None` or is skipped,
//! never an error.
//!
//! Adapters never fail: spawn errors and non-zero exits alike come back as an
//! unsuccessful [`InstallResult`], and the caller decides what to report.

use std::time::Duration;

use crate::libs::shell::Shell;
use crate::log_debug;
use crate::schemas::command::{CommandResult, CommandSpec, InstallResult, PackageInfo};

/// Declares the `apt` module (Debian, Ubuntu, WSL, Raspberry Pi OS).
pub(crate) mod apt;
/// Declares the `brew` module (Homebrew on macOS).
pub(crate) mod brew;
/// Declares the `choco` module (Chocolatey on Windows).
pub(crate) mod choco;
/// Declares the `dnf` module (DNF, or YUM on older Red Hat hosts).
pub(crate) mod dnf;
/// Declares the `snap` module. No tool installs through Snap today.
#[allow(dead_code)]
pub(crate) mod snap;
/// Declares the `winget` module (Windows Package Manager).
pub(crate) mod winget;

/// Knobs understood by `install`. Adapters ignore the ones that do not apply
/// to them.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Homebrew: install a cask instead of a formula.
    pub cask: bool,
    /// Snap: install with `--classic` confinement.
    pub classic: bool,
    /// APT: run `apt-get update` before installing.
    pub refresh_index: bool,
    /// Version pin, in whatever syntax the manager uses.
    pub version: Option<String>,
    /// Extra arguments appended verbatim.
    pub extra_args: Vec<String>,
    pub timeout: Option<Duration>,
}

impl InstallOptions {
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        InstallOptions {
            timeout,
            ..Default::default()
        }
    }
}

// Full adapter surface; the installers only need part of it.
#[allow(dead_code)]
pub trait PackageManager {
    /// Binary name, e.g. `brew`.
    fn name(&self) -> &str;

    /// Is the manager itself on PATH?
    fn is_installed(&self) -> bool;

    fn install(&self, package: &str, options: &InstallOptions) -> InstallResult;

    fn uninstall(&self, package: &str) -> InstallResult;

    fn is_package_installed(&self, package: &str) -> bool;

    fn package_version(&self, package: &str) -> Option<String>;

    /// Upgrades one package, or everything when `package` is `None`.
    fn upgrade(&self, package: Option<&str>) -> InstallResult;

    fn search(&self, query: &str) -> Vec<PackageInfo>;

    fn list_installed(&self) -> Vec<PackageInfo>;
}

/// Runs a query command. A command that cannot be started yields `None`.
pub(crate) fn query(shell: &dyn Shell, spec: &CommandSpec) -> Option<CommandResult> {
    match shell.run(spec) {
        Ok(result) => Some(result),
        Err(err) => {
            log_debug!("[Package Manager] Query `{}` could not run: {}", spec, err);
            None
        }
    }
}

/// stdout of a query that exited 0.
pub(crate) fn query_stdout(shell: &dyn Shell, spec: &CommandSpec) -> Option<String> {
    query(shell, spec)
        .filter(CommandResult::success)
        .map(|result| result.stdout)
}

/// Runs a mutating command and folds every outcome into an `InstallResult`.
pub(crate) fn mutate(shell: &dyn Shell, spec: &CommandSpec) -> InstallResult {
    match shell.run(spec) {
        Ok(result) => {
            let outcome = InstallResult::from(&result);
            if result.timed_out {
                log_debug!("[Package Manager] `{}` timed out", spec);
            }
            outcome
        }
        Err(err) => InstallResult::failed(err.to_string()),
    }
}

//! # Chocolatey Adapter
//!
//! Wraps `choco` (Chocolatey 2.x). All queries use `--limit-output`, which
//! prints machine-readable `name|version` rows instead of the decorated
//! human output.

use std::time::Duration;

use colored::Colorize;

use crate::libs::shell::Shell;
use crate::package_managers::{InstallOptions, PackageManager, mutate, query_stdout};
use crate::schemas::command::{CommandSpec, InstallResult, PackageInfo};
use crate::{log_debug, log_warn};

/// Official bootstrap script location.
pub const BOOTSTRAP_URL: &str = "https://community.chocolatey.org/install.ps1";

pub struct Chocolatey<'a> {
    shell: &'a dyn Shell,
}

impl<'a> Chocolatey<'a> {
    pub fn new(shell: &'a dyn Shell) -> Self {
        Chocolatey { shell }
    }

    /// PowerShell invocation that installs Chocolatey itself. Needs an
    /// elevated session.
    pub fn bootstrap_command(timeout: Option<Duration>) -> CommandSpec {
        let script = format!(
            "Set-ExecutionPolicy Bypass -Scope Process -Force; \
             [System.Net.ServicePointManager]::SecurityProtocol = [System.Net.ServicePointManager]::SecurityProtocol -bor 3072; \
             iex ((New-Object System.Net.WebClient).DownloadString('{BOOTSTRAP_URL}'))"
        );
        CommandSpec::new("powershell")
            .args(["-NoProfile", "-InputFormat", "None", "-ExecutionPolicy", "Bypass", "-Command"])
            .arg(script)
            .timeout(timeout)
    }

    fn limited_list(&self, args: &[&str]) -> Vec<PackageInfo> {
        query_stdout(
            self.shell,
            &CommandSpec::new("choco").args(args.iter().copied()).arg("--limit-output"),
        )
        .map(|out| parse_limit_output(&out))
        .unwrap_or_default()
    }
}

impl PackageManager for Chocolatey<'_> {
    fn name(&self) -> &str {
        "choco"
    }

    fn is_installed(&self) -> bool {
        self.shell.command_exists("choco")
    }

    fn install(&self, package: &str, options: &InstallOptions) -> InstallResult {
        let mut spec = CommandSpec::new("choco").args(["install", package, "-y"]);
        if let Some(version) = options.version.as_deref().filter(|v| !v.trim().is_empty()) {
            spec = spec.args(["--version", version]);
        }
        let spec = spec
            .args(options.extra_args.iter().cloned())
            .timeout(options.timeout);
        log_debug!("[Choco] Prepared command: {}", spec.to_string().cyan());

        let result = mutate(self.shell, &spec);
        if !result.success && result.output.contains("not running from an elevated") {
            log_warn!("[Choco] Chocolatey needs an elevated (Administrator) shell");
        }
        result
    }

    fn uninstall(&self, package: &str) -> InstallResult {
        mutate(
            self.shell,
            &CommandSpec::new("choco").args(["uninstall", package, "-y"]),
        )
    }

    fn is_package_installed(&self, package: &str) -> bool {
        self.package_version(package).is_some()
    }

    fn package_version(&self, package: &str) -> Option<String> {
        self.limited_list(&["list", "--exact", package])
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(package))
            .and_then(|p| p.version)
    }

    fn upgrade(&self, package: Option<&str>) -> InstallResult {
        mutate(
            self.shell,
            &CommandSpec::new("choco").args(["upgrade", package.unwrap_or("all"), "-y"]),
        )
    }

    fn search(&self, query: &str) -> Vec<PackageInfo> {
        self.limited_list(&["search", query])
    }

    fn list_installed(&self) -> Vec<PackageInfo> {
        self.limited_list(&["list"])
    }
}

/// `jq|1.7.1` rows; anything without a pipe is chatter and is skipped.
fn parse_limit_output(output: &str) -> Vec<PackageInfo> {
    output
        .lines()
        .filter_map(|line| {
            let (name, rest) = line.trim().split_once('|')?;
            let version = rest.split('|').next();
            (!name.is_empty()).then(|| PackageInfo::named(name).with_version(version))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::test_support::FakeShell;

    #[test]
    fn install_is_non_interactive() {
        let shell = FakeShell::new();
        Chocolatey::new(&shell).install("jq", &InstallOptions::default());
        assert_eq!(shell.calls(), vec!["choco install jq -y"]);
    }

    #[test]
    fn version_comes_from_exact_limited_list() {
        let shell = FakeShell::new().respond(
            "choco list --exact pandoc",
            0,
            "Chocolatey v2.2.2\npandoc|3.1.11\n",
        );
        let choco = Chocolatey::new(&shell);
        assert_eq!(choco.package_version("pandoc").as_deref(), Some("3.1.11"));
        assert!(choco.is_package_installed("pandoc"));
    }

    #[test]
    fn empty_list_means_not_installed() {
        let shell = FakeShell::new().respond("choco list", 0, "");
        assert!(!Chocolatey::new(&shell).is_package_installed("yq"));
    }

    #[test]
    fn upgrade_without_name_upgrades_all() {
        let shell = FakeShell::new();
        Chocolatey::new(&shell).upgrade(None);
        assert_eq!(shell.calls(), vec!["choco upgrade all -y"]);
    }

    #[test]
    fn bootstrap_runs_powershell_with_extended_timeout() {
        let spec = Chocolatey::bootstrap_command(Some(Duration::from_secs(1800)));
        assert_eq!(spec.program, "powershell");
        assert!(spec.args.last().unwrap().contains(BOOTSTRAP_URL));
        assert_eq!(spec.timeout, Some(Duration::from_secs(1800)));
    }
}

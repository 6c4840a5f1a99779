//! # DNF / YUM Adapter
//!
//! Amazon Linux, RHEL and Fedora ship `dnf`; older images only have `yum`.
//! Both accept the same install/remove/upgrade syntax, so one adapter covers
//! them and only the binary name differs. Queries go through `rpm`.

use std::sync::LazyLock;

use colored::Colorize;
use regex::Regex;

use crate::libs::shell::Shell;
use crate::package_managers::{InstallOptions, PackageManager, mutate, query_stdout};
use crate::schemas::command::{CommandSpec, InstallResult, PackageInfo};
use crate::log_debug;

// `dnf search` rows: `jq.x86_64 : Command-line JSON processor`.
static SEARCH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^\s.:]+(?:[.\-][^\s.:]+)*?)\.(?P<arch>[A-Za-z0-9_]+)\s+:\s+(?P<desc>.*)$")
        .expect("valid regex")
});

pub struct Dnf<'a> {
    shell: &'a dyn Shell,
    binary: &'static str,
}

impl<'a> Dnf<'a> {
    /// Uses `dnf` when it is on PATH, otherwise `yum`.
    pub fn detect(shell: &'a dyn Shell) -> Self {
        let binary = if shell.command_exists("dnf") { "dnf" } else { "yum" };
        Dnf { shell, binary }
    }

    /// Uses the binary the platform descriptor recorded. Anything other
    /// than `dnf` or `yum` falls back to probing PATH.
    pub fn with_binary(shell: &'a dyn Shell, binary: &str) -> Self {
        match binary {
            "dnf" => Dnf { shell, binary: "dnf" },
            "yum" => Dnf { shell, binary: "yum" },
            _ => Dnf::detect(shell),
        }
    }

    /// `dnf groupinstall -y "<group>"`, e.g. "Development Tools".
    pub fn install_group(&self, group: &str, options: &InstallOptions) -> InstallResult {
        let spec = CommandSpec::sudo(self.binary)
            .args(["groupinstall", "-y", group])
            .timeout(options.timeout);
        log_debug!("[Dnf] Prepared command: {}", spec.to_string().cyan());
        mutate(self.shell, &spec)
    }
}

impl PackageManager for Dnf<'_> {
    fn name(&self) -> &str {
        self.binary
    }

    fn is_installed(&self) -> bool {
        self.shell.command_exists(self.binary)
    }

    fn install(&self, package: &str, options: &InstallOptions) -> InstallResult {
        let target = match options.version.as_deref() {
            Some(version) if !version.trim().is_empty() => format!("{package}-{version}"),
            _ => package.to_string(),
        };
        let spec = CommandSpec::sudo(self.binary)
            .args(["install", "-y"])
            .arg(target)
            .args(options.extra_args.iter().cloned())
            .timeout(options.timeout);
        log_debug!("[Dnf] Prepared command: {}", spec.to_string().cyan());
        mutate(self.shell, &spec)
    }

    fn uninstall(&self, package: &str) -> InstallResult {
        mutate(
            self.shell,
            &CommandSpec::sudo(self.binary).args(["remove", "-y", package]),
        )
    }

    fn is_package_installed(&self, package: &str) -> bool {
        // `rpm -q` exits 1 and prints "package x is not installed" when absent.
        query_stdout(self.shell, &CommandSpec::new("rpm").args(["-q", package]))
            .is_some_and(|out| {
                let out = out.trim();
                !out.is_empty() && !out.contains("is not installed")
            })
    }

    fn package_version(&self, package: &str) -> Option<String> {
        query_stdout(
            self.shell,
            &CommandSpec::new("rpm").args(["-q", "--queryformat", "%{VERSION}", package]),
        )
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.contains(' '))
    }

    fn upgrade(&self, package: Option<&str>) -> InstallResult {
        let spec = CommandSpec::sudo(self.binary).args(["upgrade", "-y"]);
        let spec = match package {
            Some(name) => spec.arg(name),
            None => spec,
        };
        mutate(self.shell, &spec)
    }

    fn search(&self, query: &str) -> Vec<PackageInfo> {
        query_stdout(self.shell, &CommandSpec::new(self.binary).args(["search", query]))
            .map(|out| {
                out.lines()
                    .filter_map(|line| SEARCH_LINE.captures(line.trim()))
                    .map(|caps| {
                        PackageInfo::named(&caps["name"]).with_description(Some(&caps["desc"]))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn list_installed(&self) -> Vec<PackageInfo> {
        query_stdout(
            self.shell,
            &CommandSpec::new("rpm").args(["-qa", "--queryformat", "%{NAME}\t%{VERSION}\n"]),
        )
        .map(|out| {
            out.lines()
                .filter_map(|line| {
                    let (name, version) = line.split_once('\t')?;
                    Some(PackageInfo::named(name.trim()).with_version(Some(version)))
                })
                .collect()
        })
        .unwrap_or_default()
    }
}

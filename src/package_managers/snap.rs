//! # Snap Adapter
//!
//! Wraps `snap`. `snap list` and `snap find` print a header row followed by
//! whitespace-separated columns; name and version are always the first two.

use colored::Colorize;

use crate::libs::shell::Shell;
use crate::package_managers::{InstallOptions, PackageManager, mutate, query_stdout};
use crate::schemas::command::{CommandSpec, InstallResult, PackageInfo};
use crate::log_debug;

pub struct Snap<'a> {
    shell: &'a dyn Shell,
}

impl<'a> Snap<'a> {
    pub fn new(shell: &'a dyn Shell) -> Self {
        Snap { shell }
    }
}

impl PackageManager for Snap<'_> {
    fn name(&self) -> &str {
        "snap"
    }

    fn is_installed(&self) -> bool {
        self.shell.command_exists("snap")
    }

    fn install(&self, package: &str, options: &InstallOptions) -> InstallResult {
        let mut spec = CommandSpec::sudo("snap").args(["install", package]);
        if options.classic {
            spec = spec.arg("--classic");
        }
        // Snap pins by channel, e.g. `--channel=v4/stable`.
        if let Some(channel) = options.version.as_deref().filter(|v| !v.trim().is_empty()) {
            spec = spec.arg(format!("--channel={channel}"));
        }
        let spec = spec
            .args(options.extra_args.iter().cloned())
            .timeout(options.timeout);
        log_debug!("[Snap] Prepared command: {}", spec.to_string().cyan());
        mutate(self.shell, &spec)
    }

    fn uninstall(&self, package: &str) -> InstallResult {
        mutate(self.shell, &CommandSpec::sudo("snap").args(["remove", package]))
    }

    fn is_package_installed(&self, package: &str) -> bool {
        self.listed(package).is_some()
    }

    fn package_version(&self, package: &str) -> Option<String> {
        self.listed(package)?.version
    }

    fn upgrade(&self, package: Option<&str>) -> InstallResult {
        let spec = CommandSpec::sudo("snap").arg("refresh");
        let spec = match package {
            Some(name) => spec.arg(name),
            None => spec,
        };
        mutate(self.shell, &spec)
    }

    fn search(&self, query: &str) -> Vec<PackageInfo> {
        query_stdout(self.shell, &CommandSpec::new("snap").args(["find", query]))
            .map(|out| parse_rows(&out, 4))
            .unwrap_or_default()
    }

    fn list_installed(&self) -> Vec<PackageInfo> {
        query_stdout(self.shell, &CommandSpec::new("snap").arg("list"))
            .map(|out| parse_rows(&out, usize::MAX))
            .unwrap_or_default()
    }
}

impl Snap<'_> {
    fn listed(&self, package: &str) -> Option<PackageInfo> {
        let out = query_stdout(self.shell, &CommandSpec::new("snap").args(["list", package]))?;
        parse_rows(&out, usize::MAX)
            .into_iter()
            .find(|p| p.name == package)
    }
}

/// Skips the header row; columns from `summary_from` onwards are joined into
/// the description.
fn parse_rows(output: &str, summary_from: usize) -> Vec<PackageInfo> {
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Name"))
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            let name = columns.first()?;
            let summary = columns.get(summary_from..).map(|rest| rest.join(" "));
            Some(
                PackageInfo::named(name)
                    .with_version(columns.get(1).copied())
                    .with_description(summary.as_deref()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::test_support::FakeShell;

    #[test]
    fn classic_confinement_flag() {
        let shell = FakeShell::new();
        let options = InstallOptions {
            classic: true,
            ..Default::default()
        };
        Snap::new(&shell).install("go", &options);
        assert_eq!(shell.calls(), vec!["sudo snap install go --classic"]);
    }

    #[test]
    fn version_from_snap_list() {
        let shell = FakeShell::new().respond(
            "snap list yq",
            0,
            "Name  Version  Rev   Tracking       Publisher   Notes\nyq    v4.44.6  2634  latest/stable  mikefarah✓  -\n",
        );
        let snap = Snap::new(&shell);
        assert!(snap.is_package_installed("yq"));
        assert_eq!(snap.package_version("yq").as_deref(), Some("v4.44.6"));
    }

    #[test]
    fn find_keeps_summary() {
        let out = "Name  Version  Publisher   Notes  Summary\nyq    v4.44.6  mikefarah✓  -      Command-line YAML processor\n";
        let hits = parse_rows(out, 4);
        assert_eq!(hits[0].description.as_deref(), Some("Command-line YAML processor"));
    }

    #[test]
    fn missing_snap_is_not_installed() {
        let shell = FakeShell::new().respond("snap list", 1, "error: no matching snaps installed");
        assert!(!Snap::new(&shell).is_package_installed("yq"));
    }
}

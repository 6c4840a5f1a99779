//! # Homebrew Adapter
//!
//! Wraps the `brew` CLI for formulae and casks.
//!
//! ## Output formats relied on
//!
//! - `brew list --versions <name>` prints `name 1.7.1 1.6` (newest last) and
//!   exits 1 when the formula or cask is not installed.
//! - `brew search <query>` prints one name per line when piped, with `==>`
//!   section headers for formulae and casks.

use std::sync::LazyLock;

use colored::Colorize;
use regex::Regex;

use crate::libs::shell::Shell;
use crate::package_managers::{InstallOptions, PackageManager, mutate, query_stdout};
use crate::schemas::command::{CommandSpec, InstallResult, PackageInfo};
use crate::{log_debug, log_warn};

static VERSIONS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>\S+)\s+(?P<versions>.+)$").expect("valid regex")
});

pub struct Homebrew<'a> {
    shell: &'a dyn Shell,
}

impl<'a> Homebrew<'a> {
    pub fn new(shell: &'a dyn Shell) -> Self {
        Homebrew { shell }
    }

    /// Builds `brew install [--cask] <formula>[@version] [extra args]`.
    fn install_command(package: &str, options: &InstallOptions) -> CommandSpec {
        let mut spec = CommandSpec::new("brew").arg("install");
        if options.cask {
            spec = spec.arg("--cask");
        }
        // Versioned formulae use `name@version`, e.g. `go@1.22`.
        spec = match options.version.as_deref().map(str::trim) {
            Some(version) if !version.is_empty() => spec.arg(format!("{package}@{version}")),
            _ => spec.arg(package),
        };
        spec.args(options.extra_args.iter().cloned())
            .timeout(options.timeout)
    }
}

impl PackageManager for Homebrew<'_> {
    fn name(&self) -> &str {
        "brew"
    }

    fn is_installed(&self) -> bool {
        self.shell.command_exists("brew")
    }

    fn install(&self, package: &str, options: &InstallOptions) -> InstallResult {
        let spec = Homebrew::install_command(package, options);
        log_debug!("[Brew] Prepared command: {}", spec.to_string().cyan());
        let result = mutate(self.shell, &spec);
        if !result.success {
            log_warn!("[Brew] Failed to install '{}'", package.bold());
        }
        result
    }

    fn uninstall(&self, package: &str) -> InstallResult {
        mutate(self.shell, &CommandSpec::new("brew").args(["uninstall", package]))
    }

    fn is_package_installed(&self, package: &str) -> bool {
        query_stdout(
            self.shell,
            &CommandSpec::new("brew").args(["list", "--versions", package]),
        )
        .is_some_and(|out| !out.trim().is_empty())
    }

    fn package_version(&self, package: &str) -> Option<String> {
        let out = query_stdout(
            self.shell,
            &CommandSpec::new("brew").args(["list", "--versions", package]),
        )?;
        out.lines().find_map(parse_versions_line)?.version
    }

    fn upgrade(&self, package: Option<&str>) -> InstallResult {
        let spec = CommandSpec::new("brew").arg("upgrade");
        let spec = match package {
            Some(name) => spec.arg(name),
            None => spec,
        };
        mutate(self.shell, &spec)
    }

    fn search(&self, query: &str) -> Vec<PackageInfo> {
        query_stdout(self.shell, &CommandSpec::new("brew").args(["search", query]))
            .map(|out| parse_search(&out))
            .unwrap_or_default()
    }

    fn list_installed(&self) -> Vec<PackageInfo> {
        query_stdout(self.shell, &CommandSpec::new("brew").args(["list", "--versions"]))
            .map(|out| out.lines().filter_map(parse_versions_line).collect())
            .unwrap_or_default()
    }
}

/// `jq 1.6 1.7.1` → `jq` at `1.7.1`. Homebrew lists versions oldest first
/// when several kegs exist, so the last one is current.
fn parse_versions_line(line: &str) -> Option<PackageInfo> {
    let caps = VERSIONS_LINE.captures(line.trim())?;
    let version = caps["versions"].split_whitespace().last();
    Some(PackageInfo::named(&caps["name"]).with_version(version))
}

fn parse_search(output: &str) -> Vec<PackageInfo> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("==>"))
        .flat_map(str::split_whitespace)
        .map(PackageInfo::named)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::test_support::FakeShell;

    #[test]
    fn cask_install_uses_cask_flag() {
        let shell = FakeShell::new();
        let brew = Homebrew::new(&shell);
        let options = InstallOptions {
            cask: true,
            ..Default::default()
        };
        assert!(brew.install("pngyu", &options).success);
        assert_eq!(shell.calls(), vec!["brew install --cask pngyu"]);
    }

    #[test]
    fn version_pin_uses_at_syntax() {
        let options = InstallOptions {
            version: Some("1.22".into()),
            ..Default::default()
        };
        let spec = Homebrew::install_command("go", &options);
        assert_eq!(spec.to_string(), "brew install go@1.22");
    }

    #[test]
    fn reads_newest_version_from_list_output() {
        let shell = FakeShell::new().respond("brew list --versions jq", 0, "jq 1.6 1.7.1\n");
        let brew = Homebrew::new(&shell);
        assert!(brew.is_package_installed("jq"));
        assert_eq!(brew.package_version("jq").as_deref(), Some("1.7.1"));
    }

    #[test]
    fn missing_formula_is_not_installed() {
        let shell = FakeShell::new().respond("brew list --versions", 1, "");
        let brew = Homebrew::new(&shell);
        assert!(!brew.is_package_installed("pandoc"));
        assert_eq!(brew.package_version("pandoc"), None);
    }

    #[test]
    fn search_skips_section_headers() {
        let out = "==> Formulae\nyq\npython-yq\n\n==> Casks\nyacreader\n";
        let names: Vec<_> = parse_search(out).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["yq", "python-yq", "yacreader"]);
    }

    #[test]
    fn list_installed_tolerates_garbage_lines() {
        let shell = FakeShell::new().respond(
            "brew list --versions",
            0,
            "jq 1.7.1\nlonely\npandoc 3.1 3.2\n",
        );
        let listed = Homebrew::new(&shell).list_installed();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].name, "pandoc");
        assert_eq!(listed[1].version.as_deref(), Some("3.2"));
    }
}

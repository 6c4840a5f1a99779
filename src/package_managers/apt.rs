//! # APT Adapter
//!
//! Installs through `apt-get` (stable, script-friendly output) and queries
//! through `dpkg-query` and `apt-cache`.

use std::sync::LazyLock;

use colored::Colorize;
use regex::Regex;

use crate::libs::shell::Shell;
use crate::package_managers::{InstallOptions, PackageManager, mutate, query_stdout};
use crate::schemas::command::{CommandSpec, InstallResult, PackageInfo};
use crate::{log_debug, log_warn};

// `apt-cache search` prints `name - short description`.
static SEARCH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[a-z0-9][a-z0-9+.\-]*)\s+-\s+(?P<desc>.*)$").expect("valid regex")
});

pub struct Apt<'a> {
    shell: &'a dyn Shell,
}

impl<'a> Apt<'a> {
    pub fn new(shell: &'a dyn Shell) -> Self {
        Apt { shell }
    }

    fn dpkg_field(&self, package: &str, format: &str) -> Option<String> {
        query_stdout(
            self.shell,
            &CommandSpec::new("dpkg-query").args(["-W", &format!("-f={format}"), package]),
        )
    }
}

impl PackageManager for Apt<'_> {
    fn name(&self) -> &str {
        "apt"
    }

    fn is_installed(&self) -> bool {
        self.shell.command_exists("apt-get")
    }

    fn install(&self, package: &str, options: &InstallOptions) -> InstallResult {
        if options.refresh_index {
            let update = CommandSpec::sudo("apt-get")
                .args(["update", "-y"])
                .timeout(options.timeout);
            let refreshed = mutate(self.shell, &update);
            if !refreshed.success {
                // A stale index usually still installs fine.
                log_warn!("[Apt] `apt-get update` failed, continuing with the cached index");
                log_debug!("[Apt] update output: {}", refreshed.output);
            }
        }

        let target = match options.version.as_deref() {
            Some(version) if !version.trim().is_empty() => format!("{package}={version}"),
            _ => package.to_string(),
        };
        let spec = CommandSpec::sudo("apt-get")
            .args(["install", "-y"])
            .arg(target)
            .args(options.extra_args.iter().cloned())
            .timeout(options.timeout);
        log_debug!("[Apt] Prepared command: {}", spec.to_string().cyan());
        mutate(self.shell, &spec)
    }

    fn uninstall(&self, package: &str) -> InstallResult {
        mutate(
            self.shell,
            &CommandSpec::sudo("apt-get").args(["remove", "-y", package]),
        )
    }

    fn is_package_installed(&self, package: &str) -> bool {
        self.dpkg_field(package, "${Status}")
            .is_some_and(|status| status.contains("install ok installed"))
    }

    fn package_version(&self, package: &str) -> Option<String> {
        if !self.is_package_installed(package) {
            return None;
        }
        self.dpkg_field(package, "${Version}")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn upgrade(&self, package: Option<&str>) -> InstallResult {
        let spec = match package {
            Some(name) => CommandSpec::sudo("apt-get").args(["install", "--only-upgrade", "-y", name]),
            None => CommandSpec::sudo("apt-get").args(["upgrade", "-y"]),
        };
        mutate(self.shell, &spec)
    }

    fn search(&self, query: &str) -> Vec<PackageInfo> {
        query_stdout(self.shell, &CommandSpec::new("apt-cache").args(["search", query]))
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
            &CommandSpec::new("dpkg-query").args(["-W", "-f=${Package}\t${Version}\n"]),
        )
        .map(|out| parse_tab_separated(&out))
        .unwrap_or_default()
    }
}

fn parse_tab_separated(output: &str) -> Vec<PackageInfo> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let name = fields.next()?.trim();
            if name.is_empty() {
                return None;
            }
            Some(PackageInfo::named(name).with_version(fields.next()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::test_support::FakeShell;

    #[test]
    fn install_refreshes_index_first_when_asked() {
        let shell = FakeShell::new();
        let options = InstallOptions {
            refresh_index: true,
            ..Default::default()
        };
        assert!(Apt::new(&shell).install("jq", &options).success);
        assert_eq!(
            shell.calls(),
            vec!["sudo apt-get update -y", "sudo apt-get install -y jq"]
        );
    }

    #[test]
    fn installed_status_is_read_from_dpkg() {
        let shell = FakeShell::new()
            .respond("dpkg-query -W -f=${Status} jq", 0, "install ok installed")
            .respond("dpkg-query -W -f=${Version} jq", 0, "1.6-2.1ubuntu3");
        let apt = Apt::new(&shell);
        assert!(apt.is_package_installed("jq"));
        assert_eq!(apt.package_version("jq").as_deref(), Some("1.6-2.1ubuntu3"));
    }

    #[test]
    fn removed_package_with_config_left_is_not_installed() {
        let shell = FakeShell::new().respond("dpkg-query", 0, "deinstall ok config-files");
        assert!(!Apt::new(&shell).is_package_installed("pandoc"));
    }

    #[test]
    fn failed_install_surfaces_output() {
        let shell = FakeShell::new().respond(
            "sudo apt-get install",
            100,
            "E: Unable to locate package nope",
        );
        let result = Apt::new(&shell).install("nope", &InstallOptions::default());
        assert!(!result.success);
        assert!(result.output.contains("Unable to locate package"));
    }

    #[test]
    fn search_parses_name_and_description() {
        let shell = FakeShell::new().respond(
            "apt-cache search",
            0,
            "jq - lightweight and flexible command-line JSON processor\nnot a package line\n",
        );
        let hits = Apt::new(&shell).search("jq");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "jq");
        assert!(hits[0].description.as_deref().unwrap().starts_with("lightweight"));
    }

    #[test]
    fn list_skips_blank_rows() {
        let listed = parse_tab_separated("jq\t1.6\n\t\npandoc\t\n");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].version, None);
    }
}

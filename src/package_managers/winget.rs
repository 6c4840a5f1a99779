//! # winget Adapter
//!
//! Wraps the Windows Package Manager. Packages are always addressed by their
//! exact identifier (`jqlang.jq`, `MikeFarah.yq`) so that similarly named
//! packages are never picked by accident.
//!
//! `winget list` and `winget search` print a fixed-width table whose column
//! offsets are taken from the header row:
//!
//! ```text
//! Name      Id            Version  Source
//! ----------------------------------------
//! jq        jqlang.jq     1.7.1    winget
//! ```

use colored::Colorize;

use crate::libs::shell::Shell;
use crate::package_managers::{InstallOptions, PackageManager, mutate, query_stdout};
use crate::schemas::command::{CommandSpec, InstallResult, PackageInfo};
use crate::log_debug;

const AGREEMENTS: [&str; 2] = ["--accept-package-agreements", "--accept-source-agreements"];

pub struct Winget<'a> {
    shell: &'a dyn Shell,
}

impl<'a> Winget<'a> {
    pub fn new(shell: &'a dyn Shell) -> Self {
        Winget { shell }
    }
}

impl PackageManager for Winget<'_> {
    fn name(&self) -> &str {
        "winget"
    }

    fn is_installed(&self) -> bool {
        self.shell.command_exists("winget")
    }

    fn install(&self, package: &str, options: &InstallOptions) -> InstallResult {
        let mut spec = CommandSpec::new("winget")
            .args(["install", "--id", package, "--exact", "--silent"])
            .args(AGREEMENTS);
        if let Some(version) = options.version.as_deref().filter(|v| !v.trim().is_empty()) {
            spec = spec.args(["--version", version]);
        }
        let spec = spec
            .args(options.extra_args.iter().cloned())
            .timeout(options.timeout);
        log_debug!("[Winget] Prepared command: {}", spec.to_string().cyan());
        mutate(self.shell, &spec)
    }

    fn uninstall(&self, package: &str) -> InstallResult {
        mutate(
            self.shell,
            &CommandSpec::new("winget").args(["uninstall", "--id", package, "--exact", "--silent"]),
        )
    }

    fn is_package_installed(&self, package: &str) -> bool {
        self.listed(package).is_some()
    }

    fn package_version(&self, package: &str) -> Option<String> {
        self.listed(package)?.version
    }

    fn upgrade(&self, package: Option<&str>) -> InstallResult {
        let spec = match package {
            Some(id) => CommandSpec::new("winget").args(["upgrade", "--id", id, "--exact", "--silent"]),
            None => CommandSpec::new("winget").args(["upgrade", "--all", "--silent"]),
        };
        mutate(self.shell, &spec.args(AGREEMENTS))
    }

    fn search(&self, query: &str) -> Vec<PackageInfo> {
        query_stdout(
            self.shell,
            &CommandSpec::new("winget").args(["search", query, "--accept-source-agreements"]),
        )
        .map(|out| parse_table(&out))
        .unwrap_or_default()
    }

    fn list_installed(&self) -> Vec<PackageInfo> {
        query_stdout(
            self.shell,
            &CommandSpec::new("winget").args(["list", "--accept-source-agreements"]),
        )
        .map(|out| parse_table(&out))
        .unwrap_or_default()
    }
}

impl Winget<'_> {
    fn listed(&self, id: &str) -> Option<PackageInfo> {
        let out = query_stdout(
            self.shell,
            &CommandSpec::new("winget").args([
                "list",
                "--id",
                id,
                "--exact",
                "--accept-source-agreements",
            ]),
        )?;
        parse_table(&out)
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(id))
    }
}

/// Parses a winget table into `PackageInfo { name: <Id>, version, description: <Name> }`.
fn parse_table(output: &str) -> Vec<PackageInfo> {
    // Progress spinners are drawn with carriage returns; keep the final frame.
    let lines: Vec<&str> = output
        .lines()
        .map(|line| line.rsplit('\r').next().unwrap_or(line))
        .collect();

    let Some(header_at) = lines
        .iter()
        .position(|l| l.contains("Id") && l.contains("Version"))
    else {
        return Vec::new();
    };
    let header: Vec<char> = lines[header_at].chars().collect();
    let find = |word: &str| column_of(&header, word);
    let (Some(id_col), Some(version_col)) = (find("Id"), find("Version")) else {
        return Vec::new();
    };
    let name_col = find("Name").unwrap_or(0);
    let version_end = ["Available", "Match", "Source"]
        .iter()
        .filter_map(|w| find(w))
        .filter(|&c| c > version_col)
        .min();

    lines[header_at + 1..]
        .iter()
        .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('-'))
        .filter_map(|row| {
            let row: Vec<char> = row.chars().collect();
            let id = slice(&row, id_col, Some(version_col));
            if id.is_empty() {
                return None;
            }
            let version = slice(&row, version_col, version_end);
            let name = slice(&row, name_col, Some(id_col));
            Some(
                PackageInfo::named(&id)
                    .with_version(Some(&version))
                    .with_description(Some(&name)),
            )
        })
        .collect()
}

// Character offset of a header word that starts a column.
fn column_of(header: &[char], word: &str) -> Option<usize> {
    let target: Vec<char> = word.chars().collect();
    (0..header.len()).find(|&i| {
        header[i..].starts_with(&target)
            && (i == 0 || header[i - 1].is_whitespace())
            && header
                .get(i + target.len())
                .is_none_or(|c| c.is_whitespace())
    })
}

fn slice(row: &[char], start: usize, end: Option<usize>) -> String {
    if start >= row.len() {
        return String::new();
    }
    let end = end.unwrap_or(row.len()).min(row.len());
    row[start..end.max(start)].iter().collect::<String>().trim().to_string()
}

// gitego (github.com/bgreenwell/gitego) is only distributed as Go source, so
// every platform builds it with `go install`.

use colored::Colorize;
use std::path::PathBuf;

use crate::installers::Tool;
use crate::installers::go::installed_version;
use crate::libs::context::InstallContext;
use crate::libs::dispatch::PlatformInstaller;
use crate::libs::lifecycle::{InstallError, InstallOutcome, Steps};
use crate::libs::shell_profile::{ensure_lines, path_export};
use crate::libs::utilities::platform::parse_lenient_version;
use crate::log_debug;
use crate::schemas::command::CommandSpec;
use crate::schemas::platform::PlatformKind;

pub struct Gitego;

const NAME: &str = "gitego";
const MODULE: &str = "github.com/bgreenwell/gitego@latest";

impl Tool for Gitego {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Git identity manager, built with `go install`"
    }

    fn installer_for(&self, kind: &PlatformKind) -> Option<PlatformInstaller> {
        match kind {
            PlatformKind::Unsupported(_) => None,
            _ => Some(install_with_go),
        }
    }

    fn is_present(&self, ctx: &InstallContext<'_>) -> bool {
        ctx.shell.command_exists(NAME) || installed_binary(ctx).is_some_and(|p| p.is_file())
    }
}

/// Where `go install` puts gitego: `$GOBIN`, else the first `$GOPATH` entry's
/// `bin`, else `~/go/bin`.
fn installed_binary(ctx: &InstallContext<'_>) -> Option<PathBuf> {
    let file_name = match ctx.platform.kind {
        PlatformKind::Windows | PlatformKind::GitBash => "gitego.exe",
        _ => NAME,
    };
    let bin_dir = go_env_bin_dir(ctx).or_else(|| dirs::home_dir().map(|home| home.join("go").join("bin")))?;
    Some(bin_dir.join(file_name))
}

// `go env GOBIN GOPATH` prints one value per line; GOBIN is usually empty.
fn go_env_bin_dir(ctx: &InstallContext<'_>) -> Option<PathBuf> {
    if !ctx.shell.command_exists("go") {
        return None;
    }
    let output = ctx.probe(CommandSpec::new("go").args(["env", "GOBIN", "GOPATH"]))?.stdout;
    let mut lines = output.lines().map(str::trim);
    let gobin = lines.next().unwrap_or_default();
    if !gobin.is_empty() {
        return Some(PathBuf::from(gobin));
    }
    let gopath = lines.next().filter(|p| !p.is_empty())?;
    std::env::split_paths(gopath).next().map(|first| first.join("bin"))
}

pub fn install_with_go(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME)
        .guidance("`go install` puts binaries in $(go env GOPATH)/bin (usually ~/go/bin). Add it to PATH, open a new terminal and run `dev install gitego` again.")
        .run(
            || Gitego.is_present(ctx),
            || {
                require_go(ctx)?;
                ctx.run_checked(CommandSpec::new("go").args(["install", MODULE]))?;
                if !matches!(ctx.platform.kind, PlatformKind::Windows) {
                    ensure_lines(&ctx.shell_profiles(), &[path_export("$HOME/go/bin")])?;
                }
                Ok(())
            },
        )
}

// Go must be on PATH and at least the configured minimum.
fn require_go(ctx: &InstallContext<'_>) -> Result<(), InstallError> {
    let minimum = &ctx.settings.minimum_go_for_gitego;
    let Some(required) = parse_lenient_version(minimum) else {
        return Err(InstallError::prerequisite(
            &format!("a valid minimum Go version (got '{minimum}')"),
            "Fix `minimum_go_for_gitego` in the dev install config file.",
        ));
    };

    if !ctx.shell.command_exists("go") {
        return Err(InstallError::prerequisite(
            &format!("Go {minimum} or newer"),
            "Run `dev install go` first, then open a new terminal.",
        ));
    }

    match installed_version(ctx) {
        Some(found) if found >= required => {
            log_debug!("[Gitego Installer] Go {} satisfies >= {}", found.to_string().green(), required);
            Ok(())
        }
        Some(found) => Err(InstallError::prerequisite(
            &format!("Go {minimum} or newer (found {found})"),
            "Upgrade Go with `dev install go` or your package manager.",
        )),
        None => Err(InstallError::prerequisite(
            &format!("Go {minimum} or newer"),
            "`go version` did not report a version; reinstall Go with `dev install go`.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::test_support::{FakeFetcher, FakeShell, context, platform, sandboxed_settings};
    use crate::schemas::settings::Settings;

    #[test]
    fn old_go_is_a_missing_prerequisite() {
        let shell = FakeShell::new()
            .with_command("go")
            .respond("go version", 0, "go version go1.22.5 linux/amd64");
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("ubuntu", "x86_64", "apt"), &shell, &fetcher, &settings);

        match Gitego.install(&ctx).unwrap() {
            InstallOutcome::Failed(InstallError::PrerequisiteMissing { prerequisite, .. }) => {
                assert!(prerequisite.contains("1.24"));
                assert!(prerequisite.contains("1.22.5"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!shell.ran("go install"));
    }

    #[test]
    fn missing_go_is_a_missing_prerequisite() {
        let shell = FakeShell::new();
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("macos", "arm64", "brew"), &shell, &fetcher, &settings);

        assert!(matches!(
            Gitego.install(&ctx).unwrap(),
            InstallOutcome::Failed(InstallError::PrerequisiteMissing { .. })
        ));
        assert!(shell.calls().is_empty());
    }

    #[test]
    fn recent_go_runs_go_install() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sandboxed_settings(dir.path());
        let shell = FakeShell::new()
            .with_command("go")
            .respond("go version", 0, "go version go1.24.4 linux/amd64")
            .provides("go install github.com/bgreenwell/gitego@latest", "gitego");
        let fetcher = FakeFetcher::new();
        let ctx = context(platform("amazon_linux", "x86_64", "dnf"), &shell, &fetcher, &settings);

        assert!(matches!(Gitego.install(&ctx).unwrap(), InstallOutcome::Installed));
        assert_eq!(shell.count("go install"), 1);
        let profile = std::fs::read_to_string(dir.path().join(".bashrc")).unwrap();
        assert!(profile.contains("$HOME/go/bin"));
    }

    #[test]
    fn failing_go_install_surfaces_output() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sandboxed_settings(dir.path());
        let shell = FakeShell::new()
            .with_command("go")
            .respond("go version", 0, "go version go1.25.0 darwin/arm64")
            .respond("go install", 1, "go: module lookup disabled by GOPROXY=off");
        let fetcher = FakeFetcher::new();
        let ctx = context(platform("macos", "arm64", "brew"), &shell, &fetcher, &settings);

        match Gitego.install(&ctx).unwrap() {
            InstallOutcome::Failed(InstallError::CommandFailed { command, output }) => {
                assert_eq!(command, "go install github.com/bgreenwell/gitego@latest");
                assert!(output.contains("GOPROXY=off"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn rerun_finds_gitego_in_gopath_bin() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sandboxed_settings(dir.path());
        let gopath = dir.path().join("go");
        std::fs::create_dir_all(gopath.join("bin")).unwrap();
        std::fs::write(gopath.join("bin").join("gitego"), b"#!/bin/sh\n").unwrap();
        // gitego exists but the shell's PATH does not include GOPATH/bin yet.
        let shell = FakeShell::new()
            .with_command("go")
            .respond("go env GOBIN GOPATH", 0, &format!("\n{}\n", gopath.display()))
            .respond("go version", 0, "go version go1.24.4 linux/amd64");
        let fetcher = FakeFetcher::new();
        let ctx = context(platform("ubuntu", "x86_64", "apt"), &shell, &fetcher, &settings);

        assert!(matches!(Gitego.install(&ctx).unwrap(), InstallOutcome::AlreadyInstalled));
        assert!(!shell.ran("go install"));
    }

    #[test]
    fn gobin_takes_precedence_over_gopath() {
        let shell = FakeShell::new()
            .with_command("go")
            .respond("go env GOBIN GOPATH", 0, "/opt/gobin\n/home/dev/go\n");
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("fedora", "x86_64", "dnf"), &shell, &fetcher, &settings);

        assert_eq!(installed_binary(&ctx), Some(PathBuf::from("/opt/gobin/gitego")));
    }

    #[test]
    fn every_known_platform_is_eligible() {
        for kind in ["macos", "ubuntu", "rhel", "windows", "gitbash"] {
            assert!(Gitego.is_eligible(&platform(kind, "x86_64", "x")), "{kind}");
        }
        assert!(!Gitego.is_eligible(&platform("haiku", "x86_64", "none")));
    }
}

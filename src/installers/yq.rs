// Mike Farah's Go implementation of yq.
//
// The apt and pip packages called `yq` are a different, Python-based tool
// with an incompatible CLI, so the Linux installs always use the upstream
// release binary, and a `yq` on PATH only counts when it identifies itself as
// mikefarah's.

use colored::Colorize;

use crate::installers::{
    Tool, brew_install, in_user_bin, install_release_binary, install_user_binary, windows_install,
};
use crate::libs::context::InstallContext;
use crate::libs::dispatch::PlatformInstaller;
use crate::libs::lifecycle::{InstallError, InstallOutcome, Steps};
use crate::libs::utilities::platform::ArchFamily;
use crate::schemas::command::CommandSpec;
use crate::schemas::platform::PlatformKind;
use crate::{log_debug, log_warn};

pub struct Yq;

const NAME: &str = "yq";
const RELEASES: &str = "https://github.com/mikefarah/yq/releases/download";

impl Tool for Yq {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "YAML/JSON/XML processor (mikefarah/yq)"
    }

    fn installer_for(&self, kind: &PlatformKind) -> Option<PlatformInstaller> {
        match kind {
            PlatformKind::Macos => Some(install_macos),
            PlatformKind::Ubuntu
            | PlatformKind::Debian
            | PlatformKind::Wsl
            | PlatformKind::Raspbian
            | PlatformKind::AmazonLinux
            | PlatformKind::Rhel
            | PlatformKind::Fedora => Some(install_linux),
            PlatformKind::Windows => Some(install_windows),
            PlatformKind::GitBash => Some(install_gitbash),
            PlatformKind::Unsupported(_) => None,
        }
    }

    fn is_present(&self, ctx: &InstallContext<'_>) -> bool {
        matches!(yq_on_path(ctx), YqOnPath::Mikefarah) || in_user_bin(ctx, "yq.exe")
    }
}

#[derive(Debug, PartialEq, Eq)]
enum YqOnPath {
    Missing,
    Mikefarah,
    Other,
}

fn yq_on_path(ctx: &InstallContext<'_>) -> YqOnPath {
    if !ctx.shell.command_exists(NAME) {
        return YqOnPath::Missing;
    }
    let is_mikefarah = ctx
        .probe(CommandSpec::new(NAME).arg("--version"))
        .is_some_and(|r| r.combined_output().to_lowercase().contains("mikefarah"));
    if is_mikefarah { YqOnPath::Mikefarah } else { YqOnPath::Other }
}

// Runs at the start of every install step, after the presence check failed.
fn warn_if_shadowing(ctx: &InstallContext<'_>) {
    if yq_on_path(ctx) == YqOnPath::Other {
        log_warn!(
            "[Yq Installer] The {} on PATH is not mikefarah/yq (probably the Python yq); it will be shadowed by the new install.",
            NAME.bold()
        );
    }
}

pub fn install_macos(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(
        || Yq.is_present(ctx),
        || {
            warn_if_shadowing(ctx);
            brew_install(ctx, "yq", false)
        },
    )
}

/// Every Linux family uses the release binary in `/usr/local/bin`.
pub fn install_linux(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(
        || Yq.is_present(ctx),
        || {
            warn_if_shadowing(ctx);
            let url = release_url(&ctx.settings.versions.yq, "linux", &ctx.platform.architecture)?;
            log_debug!("[Yq Installer] Release URL: {}", url.blue());
            install_release_binary(ctx, &url, NAME)
        },
    )
}

pub fn install_windows(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(
        || Yq.is_present(ctx),
        || {
            warn_if_shadowing(ctx);
            windows_install(ctx, "yq", "MikeFarah.yq")
        },
    )
}

pub fn install_gitbash(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(
        || Yq.is_present(ctx),
        || {
            warn_if_shadowing(ctx);
            let url = release_url(&ctx.settings.versions.yq, "windows", &ctx.platform.architecture)?;
            install_user_binary(ctx, &url, "yq.exe")?;
            Ok(())
        },
    )
}

/// `yq_<os>_<arch>[.exe]` for the given release tag.
fn release_url(version: &str, os: &str, architecture: &str) -> Result<String, InstallError> {
    let arch = match (ArchFamily::from_machine(architecture), os) {
        (Some(ArchFamily::Amd64), _) => "amd64",
        (Some(ArchFamily::Arm64), _) => "arm64",
        (Some(ArchFamily::Arm32), "linux") => "arm",
        _ => return Err(InstallError::unsupported_architecture(NAME, architecture)),
    };
    let suffix = if os == "windows" { ".exe" } else { "" };
    // Tags carry a leading `v`; accept configured versions with or without it.
    let tag = format!("v{}", version.trim_start_matches('v'));
    Ok(format!("{RELEASES}/{tag}/yq_{os}_{arch}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::test_support::{FakeFetcher, FakeShell, context, platform, sandboxed_settings};
    use crate::schemas::settings::Settings;

    const MIKEFARAH: &str = "yq (https://github.com/mikefarah/yq/) version v4.45.4";

    #[test]
    fn architecture_selects_the_release_asset() {
        assert_eq!(
            release_url("v4.45.4", "linux", "aarch64").unwrap(),
            "https://github.com/mikefarah/yq/releases/download/v4.45.4/yq_linux_arm64"
        );
        assert_eq!(
            release_url("4.45.4", "linux", "armv7l").unwrap(),
            "https://github.com/mikefarah/yq/releases/download/v4.45.4/yq_linux_arm"
        );
        assert_eq!(
            release_url("v4.45.4", "windows", "AMD64").unwrap(),
            "https://github.com/mikefarah/yq/releases/download/v4.45.4/yq_windows_amd64.exe"
        );
    }

    #[test]
    fn unsupported_architecture_downloads_nothing() {
        let shell = FakeShell::new();
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("rhel", "s390x", "dnf"), &shell, &fetcher, &settings);

        match Yq.install(&ctx).unwrap() {
            InstallOutcome::Failed(InstallError::UnsupportedArchitecture { tool, architecture }) => {
                assert_eq!(tool, "yq");
                assert_eq!(architecture, "s390x");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(fetcher.urls().is_empty());
        assert!(shell.calls().is_empty());
    }

    #[test]
    fn linux_installs_release_binary_with_sudo() {
        let shell = FakeShell::new()
            .provides("sudo install -m 0755", "yq")
            .respond("yq --version", 0, MIKEFARAH);
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("ubuntu", "aarch64", "apt"), &shell, &fetcher, &settings);

        let outcome = Yq.install(&ctx).unwrap();
        assert!(matches!(outcome, InstallOutcome::Installed));
        assert_eq!(
            fetcher.urls(),
            vec!["https://github.com/mikefarah/yq/releases/download/v4.45.4/yq_linux_arm64".to_string()]
        );
        assert!(shell.ran("sudo install -m 0755"));
        assert!(shell.calls().iter().any(|c| c.ends_with("/usr/local/bin/yq")));
        assert!(!shell.ran("sudo apt-get"));
    }

    #[test]
    fn python_yq_does_not_count_as_installed() {
        let shell = FakeShell::new()
            .with_command("yq")
            .respond("yq --version", 0, "yq 3.4.3");
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("debian", "x86_64", "apt"), &shell, &fetcher, &settings);

        assert_eq!(yq_on_path(&ctx), YqOnPath::Other);
        assert!(!Yq.is_present(&ctx));
    }

    #[test]
    fn mikefarah_yq_is_already_installed() {
        let shell = FakeShell::new()
            .with_command("yq")
            .respond("yq --version", 0, MIKEFARAH);
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("fedora", "x86_64", "dnf"), &shell, &fetcher, &settings);

        let outcome = Yq.install(&ctx).unwrap();
        assert!(matches!(outcome, InstallOutcome::AlreadyInstalled));
        assert!(fetcher.urls().is_empty());
    }

    #[test]
    fn windows_uses_the_mikefarah_winget_id() {
        let shell = FakeShell::new().with_command("winget");
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("windows", "AMD64", "winget"), &shell, &fetcher, &settings);

        let _ = Yq.install(&ctx).unwrap();
        assert!(shell.ran("winget install --id MikeFarah.yq --exact"));
    }

    #[test]
    fn gitbash_rerun_finds_the_user_bin_copy() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sandboxed_settings(dir.path());
        let shell = FakeShell::new();
        let fetcher = FakeFetcher::new();
        let ctx = context(platform("gitbash", "x86_64", "choco"), &shell, &fetcher, &settings);

        assert!(matches!(Yq.install(&ctx).unwrap(), InstallOutcome::Installed));
        assert!(matches!(Yq.install(&ctx).unwrap(), InstallOutcome::AlreadyInstalled));
        assert_eq!(
            fetcher.urls(),
            vec!["https://github.com/mikefarah/yq/releases/download/v4.45.4/yq_windows_amd64.exe".to_string()]
        );
    }
}

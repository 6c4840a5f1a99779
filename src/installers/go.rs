// The Go toolchain.
//
// Linux hosts get the official go.dev tarball in /usr/local/go (distribution
// packages lag far behind and gitego needs a recent toolchain). The tarball
// replaces any previous /usr/local/go wholesale, which is what the Go docs
// prescribe: extracting over an old tree leaves stale files behind.

use colored::Colorize;
use semver::Version;

use crate::installers::{Tool, brew_install, windows_install};
use crate::libs::context::InstallContext;
use crate::libs::dispatch::PlatformInstaller;
use crate::libs::downloads::download;
use crate::libs::lifecycle::{InstallError, InstallOutcome, Steps};
use crate::libs::shell_profile::{ensure_lines, path_export};
use crate::libs::utilities::platform::{ArchFamily, parse_lenient_version};
use crate::schemas::command::CommandSpec;
use crate::schemas::platform::PlatformKind;
use crate::{log_debug, log_info};

pub struct Go;

const NAME: &str = "go";
const GO_ROOT: &str = "/usr/local/go";

impl Tool for Go {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "The Go programming language toolchain"
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
            PlatformKind::GitBash | PlatformKind::Unsupported(_) => None,
        }
    }

    fn is_present(&self, ctx: &InstallContext<'_>) -> bool {
        installed_version(ctx).is_some()
    }
}

/// Version of the Go toolchain reachable from this process: `go` on PATH, or
/// the tarball install under /usr/local/go on Linux when the current shell
/// has not picked up the PATH change yet.
pub fn installed_version(ctx: &InstallContext<'_>) -> Option<Version> {
    let mut candidates = Vec::new();
    if ctx.shell.command_exists(NAME) {
        candidates.push(NAME.to_string());
    }
    if ctx.platform.kind.is_debian_family() || ctx.platform.kind.is_redhat_family() {
        candidates.push(format!("{GO_ROOT}/bin/go"));
    }
    candidates.iter().find_map(|program| {
        let result = ctx.probe(CommandSpec::new(program).arg("version"))?;
        parse_go_version(&result.stdout)
    })
}

/// `go version go1.22.5 linux/amd64` → 1.22.5
fn parse_go_version(output: &str) -> Option<Version> {
    output
        .split_whitespace()
        .find(|token| token.starts_with("go") && token[2..].starts_with(|c: char| c.is_ascii_digit()))
        .and_then(parse_lenient_version)
}

pub fn install_macos(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| Go.is_present(ctx), || brew_install(ctx, "go", false))
}

pub fn install_windows(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| Go.is_present(ctx), || windows_install(ctx, "golang", "GoLang.Go"))
}

pub fn install_linux(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(
        || Go.is_present(ctx),
        || {
            let file_name = tarball_name(&ctx.settings.versions.go, &ctx.platform.architecture)?;
            let url = format!("https://go.dev/dl/{file_name}");
            log_debug!("[Go Installer] Tarball URL: {}", url.blue());

            let tarball = download(ctx.fetcher, &url, &file_name)?;
            ctx.run_checked(CommandSpec::sudo("rm").args(["-rf", GO_ROOT]))?;
            ctx.run_checked(
                CommandSpec::sudo("tar")
                    .args(["-C", "/usr/local", "-xzf"])
                    .arg(tarball.path().display().to_string()),
            )?;

            ensure_lines(
                &ctx.shell_profiles(),
                &[path_export(&format!("{GO_ROOT}/bin")), path_export("$HOME/go/bin")],
            )?;
            log_info!("Go was installed to {}", GO_ROOT.cyan());
            Ok(())
        },
    )
}

/// `go<version>.linux-<arch>.tar.gz`
fn tarball_name(version: &str, architecture: &str) -> Result<String, InstallError> {
    let arch = match ArchFamily::from_machine(architecture) {
        Some(ArchFamily::Amd64) => "amd64",
        Some(ArchFamily::Arm64) => "arm64",
        Some(ArchFamily::Arm32) => "armv6l",
        None => return Err(InstallError::unsupported_architecture(NAME, architecture)),
    };
    let version = version.trim().trim_start_matches("go");
    Ok(format!("go{version}.linux-{arch}.tar.gz"))
}

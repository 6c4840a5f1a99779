// One module per installable tool.
//
// Every tool implements [`Tool`]: a dispatch table (`installer_for`, a `match`
// over `PlatformKind`) plus a presence probe. The platform functions
// themselves are plain `pub fn install_<platform>(ctx)` items so they can be
// called and tested directly.
//
// The helpers at the bottom of this file are the building blocks the platform
// functions share: "install this package with that manager", "put this
// downloaded binary on PATH", and so on.

use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::libs::context::InstallContext;
use crate::libs::dispatch::{PlatformInstaller, dispatch};
use crate::libs::downloads::download;
use crate::libs::lifecycle::{InstallError, InstallOutcome};
use crate::libs::shell_profile::{ensure_lines, path_export};
use crate::libs::utilities::binary::{make_executable, move_and_rename_binary};
use crate::package_managers::{InstallOptions, PackageManager};
use crate::schemas::command::CommandSpec;
use crate::schemas::platform::{PlatformDescriptor, PlatformKind};
use crate::{log_debug, log_info};

/// Xcode CLT, build-essential, Development Tools, VS Build Tools.
pub(crate) mod compilers;
/// Chocolatey itself (Windows).
pub(crate) mod chocolatey;
/// `file(1)`.
pub(crate) mod file;
/// gitego via `go install`.
pub(crate) mod gitego;
/// The Go toolchain.
pub(crate) mod go;
pub(crate) mod jq;
pub(crate) mod pandoc;
/// Pngyu, or pngquant where Pngyu is not available.
pub(crate) mod pngyu;
/// Mike Farah's yq.
pub(crate) mod yq;

/// Where the sudo-based release installs put binaries.
pub const SYSTEM_BIN_DIR: &str = "/usr/local/bin";

pub trait Tool: Sync {
    /// The name used on the command line, e.g. `jq`.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// The dispatch table: the platform function for `kind`, if any.
    fn installer_for(&self, kind: &PlatformKind) -> Option<PlatformInstaller>;

    /// Is the tool already available on this host?
    fn is_present(&self, ctx: &InstallContext<'_>) -> bool;

    fn is_eligible(&self, platform: &PlatformDescriptor) -> bool {
        self.installer_for(&platform.kind).is_some()
    }

    fn install(&self, ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
        dispatch(self.name(), self.installer_for(&ctx.platform.kind), ctx)
    }
}

/// Fails with an actionable message when `manager` is not on PATH.
pub(crate) fn require_manager(manager: &dyn PackageManager, remediation: &str) -> Result<(), InstallError> {
    if manager.is_installed() {
        Ok(())
    } else {
        Err(InstallError::prerequisite(manager.name(), remediation))
    }
}

/// Installs `package` with `manager`; an unsuccessful adapter result becomes
/// `CommandFailed` carrying the manager's output.
pub(crate) fn install_package(
    manager: &dyn PackageManager,
    package: &str,
    options: &InstallOptions,
) -> Result<(), InstallError> {
    log_debug!("[Installers] {} install {}", manager.name().cyan(), package.bold());
    let result = manager.install(package, options);
    if result.success {
        Ok(())
    } else {
        Err(InstallError::adapter_failed(
            &format!("{} install {}", manager.name(), package),
            &result,
        ))
    }
}

pub(crate) fn brew_install(ctx: &InstallContext<'_>, package: &str, cask: bool) -> Result<(), InstallError> {
    let brew = ctx.brew();
    require_manager(&brew, "Install Homebrew from https://brew.sh and try again.")?;
    let options = InstallOptions {
        cask,
        ..InstallOptions::with_timeout(ctx.default_timeout())
    };
    install_package(&brew, package, &options)
}

pub(crate) fn apt_install(ctx: &InstallContext<'_>, package: &str) -> Result<(), InstallError> {
    let apt = ctx.apt();
    require_manager(&apt, "This host does not appear to use APT.")?;
    let options = InstallOptions {
        refresh_index: true,
        ..InstallOptions::with_timeout(ctx.default_timeout())
    };
    install_package(&apt, package, &options)
}

pub(crate) fn dnf_install(ctx: &InstallContext<'_>, package: &str) -> Result<(), InstallError> {
    let dnf = ctx.dnf();
    require_manager(&dnf, "Neither dnf nor yum was found on PATH.")?;
    install_package(&dnf, package, &InstallOptions::with_timeout(ctx.default_timeout()))
}

/// Windows: Chocolatey when available, otherwise winget.
pub(crate) fn windows_install(
    ctx: &InstallContext<'_>,
    choco_package: &str,
    winget_id: &str,
) -> Result<(), InstallError> {
    let options = InstallOptions::with_timeout(ctx.default_timeout());
    let choco = ctx.choco();
    if choco.is_installed() {
        return install_package(&choco, choco_package, &options);
    }
    let winget = ctx.winget();
    if winget.is_installed() {
        return install_package(&winget, winget_id, &options);
    }
    Err(InstallError::prerequisite(
        "Chocolatey or winget",
        "Run `dev install chocolatey` from an elevated shell, or install App Installer from the Microsoft Store for winget.",
    ))
}

/// Downloads `url` and installs it as `/usr/local/bin/<binary_name>` with
/// `sudo install -m 0755`.
pub(crate) fn install_release_binary(
    ctx: &InstallContext<'_>,
    url: &str,
    binary_name: &str,
) -> Result<(), InstallError> {
    let downloaded = download(ctx.fetcher, url, binary_name)?;
    sudo_install_binary(ctx, downloaded.path(), binary_name)
}

/// `sudo install -m 0755 <src> /usr/local/bin/<binary_name>`
pub(crate) fn sudo_install_binary(
    ctx: &InstallContext<'_>,
    src: &Path,
    binary_name: &str,
) -> Result<(), InstallError> {
    let dest = format!("{SYSTEM_BIN_DIR}/{binary_name}");
    ctx.run_checked(
        CommandSpec::sudo("install")
            .args(["-m", "0755"])
            .arg(src.display().to_string())
            .arg(dest),
    )?;
    Ok(())
}

/// Moves an already-downloaded file into the user bin dir and makes sure that
/// directory is on PATH. Returns the final location.
pub(crate) fn place_in_user_bin(
    ctx: &InstallContext<'_>,
    src: &Path,
    binary_name: &str,
) -> Result<PathBuf, InstallError> {
    let dest = ctx.user_bin_dir().join(binary_name);
    move_and_rename_binary(src, &dest)?;
    make_executable(&dest)?;
    log_info!("Placed {} in {}", binary_name.bold(), dest.display().to_string().cyan());
    ensure_lines(
        &ctx.shell_profiles(),
        &[path_export(&profile_literal(&ctx.settings.user_bin_dir))],
    )?;
    Ok(dest)
}

/// A Git Bash install already sitting in the user bin dir. The running shell
/// may predate the profile change that puts that dir on PATH.
pub(crate) fn in_user_bin(ctx: &InstallContext<'_>, binary_name: &str) -> bool {
    matches!(ctx.platform.kind, PlatformKind::GitBash) && ctx.user_bin_dir().join(binary_name).is_file()
}

/// Downloads `url` straight into the user bin dir (Git Bash installs).
pub(crate) fn install_user_binary(
    ctx: &InstallContext<'_>,
    url: &str,
    binary_name: &str,
) -> Result<PathBuf, InstallError> {
    let downloaded = download(ctx.fetcher, url, binary_name)?;
    place_in_user_bin(ctx, downloaded.path(), binary_name)
}

// `~/bin` is written as `$HOME/bin` so the profile stays portable.
fn profile_literal(dir: &str) -> String {
    match dir.strip_prefix('~') {
        Some(rest) => format!("$HOME{rest}"),
        None => dir.to_string(),
    }
}

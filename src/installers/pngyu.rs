// Pngyu is a macOS GUI front end for pngquant. Its cask does not run on
// macOS 14 (Sonoma) and later, and there is no Linux or Windows build, so
// those hosts get the pngquant CLI instead.

use colored::Colorize;
use semver::Version;

use crate::installers::{Tool, apt_install, brew_install, dnf_install, install_package, require_manager};
use crate::libs::context::InstallContext;
use crate::libs::dispatch::PlatformInstaller;
use crate::libs::lifecycle::{InstallError, InstallOutcome, Steps};
use crate::libs::utilities::platform::parse_lenient_version;
use crate::log_info;
use crate::package_managers::{InstallOptions, PackageManager};
use crate::schemas::platform::PlatformKind;

pub struct Pngyu;

const NAME: &str = "pngyu";
const SUBSTITUTE: &str = "pngquant";
/// First macOS major version the Pngyu cask no longer supports.
const FIRST_UNSUPPORTED_MACOS_MAJOR: u64 = 14;

impl Tool for Pngyu {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "PNG compressor (Pngyu app, or the pngquant CLI)"
    }

    fn installer_for(&self, kind: &PlatformKind) -> Option<PlatformInstaller> {
        match kind {
            PlatformKind::Macos => Some(install_macos),
            PlatformKind::Ubuntu | PlatformKind::Debian | PlatformKind::Wsl | PlatformKind::Raspbian => {
                Some(install_ubuntu)
            }
            PlatformKind::AmazonLinux | PlatformKind::Rhel | PlatformKind::Fedora => Some(install_amazon_linux),
            PlatformKind::Windows => Some(install_windows),
            PlatformKind::GitBash | PlatformKind::Unsupported(_) => None,
        }
    }

    fn is_present(&self, ctx: &InstallContext<'_>) -> bool {
        if matches!(ctx.platform.kind, PlatformKind::Macos) && cask_supported(ctx.platform.os_version.as_deref()) {
            ctx.brew().is_package_installed(NAME)
        } else {
            ctx.shell.command_exists(SUBSTITUTE)
        }
    }
}

/// The cask works below macOS 14. An unknown version is treated as current.
fn cask_supported(os_version: Option<&str>) -> bool {
    os_version
        .and_then(parse_lenient_version)
        .is_some_and(|v| v < Version::new(FIRST_UNSUPPORTED_MACOS_MAJOR, 0, 0))
}

pub fn install_macos(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    if cask_supported(ctx.platform.os_version.as_deref()) {
        return Steps::new(NAME).run(|| Pngyu.is_present(ctx), || brew_install(ctx, NAME, true));
    }
    log_info!(
        "Pngyu is not supported on macOS {}; installing {} instead.",
        ctx.platform.os_version.as_deref().unwrap_or("(unknown)"),
        SUBSTITUTE.bold()
    );
    Steps::new(SUBSTITUTE).run(|| Pngyu.is_present(ctx), || brew_install(ctx, SUBSTITUTE, false))
}

pub fn install_ubuntu(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    announce_substitute();
    Steps::new(SUBSTITUTE).run(|| Pngyu.is_present(ctx), || apt_install(ctx, SUBSTITUTE))
}

pub fn install_amazon_linux(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    announce_substitute();
    Steps::new(SUBSTITUTE).run(|| Pngyu.is_present(ctx), || dnf_install(ctx, SUBSTITUTE))
}

/// Only Chocolatey packages pngquant.
pub fn install_windows(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    announce_substitute();
    Steps::new(SUBSTITUTE).run(
        || Pngyu.is_present(ctx),
        || {
            let choco = ctx.choco();
            require_manager(&choco, "Run `dev install chocolatey` from an elevated shell first.")?;
            install_package(&choco, SUBSTITUTE, &InstallOptions::with_timeout(ctx.default_timeout()))
        },
    )
}

fn announce_substitute() {
    log_info!("Pngyu is macOS-only; installing the {} CLI instead.", SUBSTITUTE.bold());
}

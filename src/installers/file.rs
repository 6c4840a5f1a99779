// `file(1)`. Homebrew calls the formula `file-formula` to avoid clashing with
// the system binary.

use crate::installers::{Tool, apt_install, brew_install, dnf_install};
use crate::libs::context::InstallContext;
use crate::libs::dispatch::PlatformInstaller;
use crate::libs::lifecycle::{InstallError, InstallOutcome, Steps};
use crate::schemas::platform::PlatformKind;

pub struct File;

const NAME: &str = "file";

impl Tool for File {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Determine file types from their contents"
    }

    fn installer_for(&self, kind: &PlatformKind) -> Option<PlatformInstaller> {
        match kind {
            PlatformKind::Macos => Some(install_macos),
            PlatformKind::Ubuntu | PlatformKind::Debian | PlatformKind::Wsl | PlatformKind::Raspbian => {
                Some(install_ubuntu)
            }
            PlatformKind::AmazonLinux | PlatformKind::Rhel | PlatformKind::Fedora => Some(install_amazon_linux),
            PlatformKind::GitBash => Some(install_gitbash),
            PlatformKind::Windows | PlatformKind::Unsupported(_) => None,
        }
    }

    fn is_present(&self, ctx: &InstallContext<'_>) -> bool {
        ctx.shell.command_exists(NAME)
    }
}

pub fn install_macos(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| File.is_present(ctx), || brew_install(ctx, "file-formula", false))
}

pub fn install_ubuntu(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| File.is_present(ctx), || apt_install(ctx, NAME))
}

pub fn install_amazon_linux(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| File.is_present(ctx), || dnf_install(ctx, NAME))
}

/// Git for Windows bundles `file.exe`; there is nothing to install, only to
/// check.
pub fn install_gitbash(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(
        || File.is_present(ctx),
        || {
            Err(InstallError::prerequisite(
                "file.exe from Git for Windows",
                "Reinstall or update Git for Windows; `file` ships in its /usr/bin.",
            ))
        },
    )
}

// Chocolatey itself, bootstrapped with the official PowerShell script.

use crate::installers::Tool;
use crate::libs::context::InstallContext;
use crate::libs::dispatch::PlatformInstaller;
use crate::libs::lifecycle::{InstallError, InstallOutcome, Steps};
use crate::package_managers::PackageManager;
use crate::package_managers::choco::Chocolatey as ChocoAdapter;
use crate::schemas::platform::PlatformKind;

pub struct Chocolatey;

const NAME: &str = "chocolatey";

impl Tool for Chocolatey {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Windows package manager (needs an elevated shell)"
    }

    fn installer_for(&self, kind: &PlatformKind) -> Option<PlatformInstaller> {
        match kind {
            PlatformKind::Windows | PlatformKind::GitBash => Some(install_windows),
            _ => None,
        }
    }

    fn is_present(&self, ctx: &InstallContext<'_>) -> bool {
        ctx.choco().is_installed()
    }
}

/// Runs the bootstrap script under the extended timeout; it downloads the
/// Chocolatey package and rewrites the machine PATH.
pub fn install_windows(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME)
        .guidance("Chocolatey installs to C:\\ProgramData\\chocolatey\\bin. Open a new elevated shell so PATH includes it.")
        .run(
            || Chocolatey.is_present(ctx),
            || {
                ctx.run_checked(ChocoAdapter::bootstrap_command(ctx.extended_timeout()))?;
                Ok(())
            },
        )
}

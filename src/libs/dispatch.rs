// Dispatch entry point: looks up the platform function a tool registered for
// the detected platform and runs it.

use colored::Colorize;

use crate::libs::context::InstallContext;
use crate::libs::lifecycle::{InstallError, InstallOutcome};
use crate::{log_debug, log_info};

/// A platform-specific installer, e.g. `jq::install_ubuntu`.
pub type PlatformInstaller = fn(&InstallContext<'_>) -> Result<InstallOutcome, InstallError>;

/// Runs `installer` or, when the tool has none for this platform, says so and
/// returns `NotAvailable`. Exceptional errors from the installer propagate.
pub fn dispatch(
    tool: &str,
    installer: Option<PlatformInstaller>,
    ctx: &InstallContext<'_>,
) -> Result<InstallOutcome, InstallError> {
    let Some(install) = installer else {
        log_info!("{} is not available for {}.", tool, ctx.platform.kind);
        return Ok(InstallOutcome::NotAvailable);
    };

    log_debug!(
        "[Dispatch] Running {} installer for {} ({}, {})",
        tool.bold(),
        ctx.platform.kind.to_string().cyan(),
        ctx.platform.architecture,
        ctx.platform.package_manager
    );
    install(ctx)
}

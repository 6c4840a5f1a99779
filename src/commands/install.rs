// `dev install <tool>`: detect the host, run the tool's installer, report.

use anyhow::Context;
use colored::Colorize;

use crate::cli::type_enums::ToolKind;
use crate::commands::Host;
use crate::installers::Tool;
use crate::libs::context::InstallContext;
use crate::libs::lifecycle::InstallOutcome;
use crate::schemas::settings::Settings;
use crate::{log_debug, log_info, log_warn};

pub fn run(tool: ToolKind, settings: Settings) -> anyhow::Result<()> {
    let host = Host::detect(settings);
    execute(tool.tool(), &host.context())?;
    Ok(())
}

/// Runs `tool` against `ctx`. Reported failures come back as
/// `InstallOutcome::Failed`; only exceptional errors are `Err`.
pub fn execute(tool: &dyn Tool, ctx: &InstallContext<'_>) -> anyhow::Result<InstallOutcome> {
    log_debug!(
        "[Install] Platform {} ({}, {})",
        ctx.platform.kind.to_string().cyan(),
        ctx.platform.architecture,
        ctx.platform.package_manager
    );

    let outcome = tool
        .install(ctx)
        .with_context(|| format!("installing {} on {}", tool.name(), ctx.platform.kind))?;

    if outcome.is_failure() {
        log_warn!("{} was not installed. See the messages above.", tool.name().bold());
    } else if matches!(outcome, InstallOutcome::Installed) {
        log_info!("Done: {} is ready to use.", tool.name().bold());
    }
    Ok(outcome)
}

// `dev check <tool>`: is the tool available here, and is it already installed?
// Runs only read-only probes.

use colored::Colorize;

use crate::cli::type_enums::ToolKind;
use crate::commands::Host;
use crate::installers::Tool;
use crate::libs::context::InstallContext;
use crate::log_info;
use crate::schemas::settings::Settings;

/// Eligibility and presence of one tool on one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    pub eligible: bool,
    pub present: bool,
}

pub fn status(tool: &dyn Tool, ctx: &InstallContext<'_>) -> ToolStatus {
    ToolStatus {
        eligible: tool.is_eligible(&ctx.platform),
        present: tool.is_present(ctx),
    }
}

pub fn run(tool: ToolKind, settings: Settings) -> anyhow::Result<()> {
    let host = Host::detect(settings);
    let ctx = host.context();
    let tool = tool.tool();
    let status = status(tool, &ctx);

    match (status.eligible, status.present) {
        (_, true) => log_info!("{} is installed.", tool.name().bold().green()),
        (true, false) => log_info!(
            "{} is not installed. Run `dev install {}`.",
            tool.name().bold().yellow(),
            tool.name()
        ),
        (false, false) => log_info!("{} is not available for {}.", tool.name(), ctx.platform.kind),
    }
    Ok(())
}

// `dev list`: every known tool with its availability on this host.

use prettytable::{Table, format, row};

use crate::cli::type_enums::ToolKind;
use crate::commands::Host;
use crate::commands::check::{ToolStatus, status};
use crate::libs::context::InstallContext;
use crate::log_info;
use crate::schemas::settings::Settings;

pub fn run(settings: Settings) -> anyhow::Result<()> {
    let host = Host::detect(settings);
    let ctx = host.context();
    log_info!("Tools for {} ({}):", ctx.platform.kind, ctx.platform.architecture);
    build_table(&ctx).printstd();
    Ok(())
}

fn build_table(ctx: &InstallContext<'_>) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["Tool", "Description", "Available", "Installed"]);
    for kind in ToolKind::ALL {
        let tool = kind.tool();
        let ToolStatus { eligible, present } = status(tool, ctx);
        table.add_row(row![tool.name(), tool.description(), yes_no(eligible), yes_no(present)]);
    }
    table
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

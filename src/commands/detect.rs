// `dev detect [--json]`: shows what the platform detector sees.

use colored::Colorize;

use crate::libs::platform_detector;
use crate::libs::shell::SystemShell;
use crate::log_info;
use crate::schemas::platform::PlatformDescriptor;

pub fn run(json: bool) -> anyhow::Result<()> {
    let platform = platform_detector::detect(&SystemShell);
    if json {
        println!("{}", render_json(&platform)?);
    } else {
        log_info!("Platform:        {}", platform.kind.to_string().cyan());
        log_info!("Architecture:    {}", platform.architecture);
        log_info!("Package manager: {}", platform.package_manager.green());
        if let Some(version) = &platform.os_version {
            log_info!("OS version:      {}", version);
        }
    }
    Ok(())
}

fn render_json(platform: &PlatformDescriptor) -> serde_json::Result<String> {
    serde_json::to_string_pretty(platform)
}

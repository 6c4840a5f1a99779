// Register application subcommands.
// Each module corresponds to a specific `dev` command-line action.

use crate::libs::context::InstallContext;
use crate::libs::downloads::HttpFetcher;
use crate::libs::platform_detector;
use crate::libs::shell::SystemShell;
use crate::schemas::platform::PlatformDescriptor;
use crate::schemas::settings::Settings;

// Reports whether one tool is available and installed.
pub mod check;
// Prints the detected platform.
pub mod detect;
// Runs one installer.
pub mod install;
// Table of every tool for this host.
pub mod list;
// Displays the version of `dev`.
pub mod version;

/// The real host: system shell, HTTP downloads, detected platform.
pub struct Host {
    shell: SystemShell,
    fetcher: HttpFetcher,
    settings: Settings,
    platform: PlatformDescriptor,
}

impl Host {
    pub fn detect(settings: Settings) -> Self {
        let shell = SystemShell;
        let platform = platform_detector::detect(&shell);
        Host {
            fetcher: HttpFetcher::new(settings.timeouts.default_timeout()),
            shell,
            settings,
            platform,
        }
    }

    pub fn context(&self) -> InstallContext<'_> {
        InstallContext::new(self.platform.clone(), &self.shell, &self.fetcher, &self.settings)
    }
}

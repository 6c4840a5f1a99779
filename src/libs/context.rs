// Everything a platform installer needs for one run, bundled so the dispatch
// signature stays `fn(&InstallContext) -> ...`.

use std::path::PathBuf;
use std::time::Duration;

use crate::libs::downloads::Fetcher;
use crate::libs::lifecycle::InstallError;
use crate::libs::shell::Shell;
use crate::libs::utilities::path_helpers::expand_path;
use crate::package_managers::apt::Apt;
use crate::package_managers::brew::Homebrew;
use crate::package_managers::choco::Chocolatey;
use crate::package_managers::dnf::Dnf;
use crate::package_managers::snap::Snap;
use crate::package_managers::winget::Winget;
use crate::schemas::command::{CommandResult, CommandSpec};
use crate::schemas::platform::PlatformDescriptor;
use crate::schemas::settings::Settings;

pub struct InstallContext<'a> {
    pub platform: PlatformDescriptor,
    pub shell: &'a dyn Shell,
    pub fetcher: &'a dyn Fetcher,
    pub settings: &'a Settings,
}

impl<'a> InstallContext<'a> {
    pub fn new(
        platform: PlatformDescriptor,
        shell: &'a dyn Shell,
        fetcher: &'a dyn Fetcher,
        settings: &'a Settings,
    ) -> Self {
        InstallContext {
            platform,
            shell,
            fetcher,
            settings,
        }
    }

    pub fn brew(&self) -> Homebrew<'a> {
        Homebrew::new(self.shell)
    }

    pub fn apt(&self) -> Apt<'a> {
        Apt::new(self.shell)
    }

    /// DNF or YUM, whichever the detector recorded for this host.
    pub fn dnf(&self) -> Dnf<'a> {
        Dnf::with_binary(self.shell, &self.platform.package_manager)
    }

    pub fn choco(&self) -> Chocolatey<'a> {
        Chocolatey::new(self.shell)
    }

    pub fn winget(&self) -> Winget<'a> {
        Winget::new(self.shell)
    }

    #[allow(dead_code)]
    pub fn snap(&self) -> Snap<'a> {
        Snap::new(self.shell)
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.settings.timeouts.default_timeout()
    }

    pub fn extended_timeout(&self) -> Option<Duration> {
        self.settings.timeouts.extended_timeout()
    }

    /// Runs a command that must succeed. Applies the default timeout when the
    /// spec has none; a non-zero exit becomes `CommandFailed`.
    pub fn run_checked(&self, spec: CommandSpec) -> Result<CommandResult, InstallError> {
        let spec = match spec.timeout {
            Some(_) => spec,
            None => {
                let timeout = self.default_timeout();
                spec.timeout(timeout)
            }
        };
        let result = self.shell.run(&spec)?;
        if result.success() {
            Ok(result)
        } else {
            Err(InstallError::command_failed(&spec, &result))
        }
    }

    /// Runs a probe command; any failure (including spawn failure) is `None`.
    pub fn probe(&self, spec: CommandSpec) -> Option<CommandResult> {
        self.shell.run(&spec).ok().filter(CommandResult::success)
    }

    pub fn user_bin_dir(&self) -> PathBuf {
        expand_path(&self.settings.user_bin_dir)
    }

    pub fn shell_profiles(&self) -> Vec<PathBuf> {
        self.settings
            .shell_profiles
            .iter()
            .map(|p| expand_path(p))
            .collect()
    }
}

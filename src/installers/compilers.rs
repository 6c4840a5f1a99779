// A C/C++ toolchain: Xcode Command Line Tools, build-essential, the
// "Development Tools" group, or Visual Studio Build Tools.

use colored::Colorize;

use crate::installers::{Tool, apt_install, install_package, require_manager};
use crate::libs::context::InstallContext;
use crate::libs::dispatch::PlatformInstaller;
use crate::libs::lifecycle::{InstallError, InstallOutcome, Steps};
use crate::package_managers::{InstallOptions, PackageManager};
use crate::schemas::command::CommandSpec;
use crate::schemas::platform::PlatformKind;
use crate::{log_info, log_warn};

pub struct Compilers;

const NAME: &str = "compilers";
const DEV_TOOLS_GROUP: &str = "Development Tools";
const VS_BUILD_TOOLS: &str = "Microsoft.VisualStudio.2022.BuildTools";
const VS_WORKLOADS: &str = "--wait --quiet --add Microsoft.VisualStudio.Workload.VCTools --includeRecommended";

impl Tool for Compilers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "C/C++ compiler toolchain (gcc/clang/MSVC and make)"
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
        match ctx.platform.kind {
            // `xcode-select -p` prints the developer dir once the tools exist.
            PlatformKind::Macos => ctx
                .probe(CommandSpec::new("xcode-select").arg("-p"))
                .is_some_and(|r| !r.stdout.trim().is_empty()),
            PlatformKind::Windows => {
                let winget = ctx.winget();
                winget.is_installed() && winget.is_package_installed(VS_BUILD_TOOLS)
            }
            _ => ["gcc", "g++", "make"].iter().all(|c| ctx.shell.command_exists(c)),
        }
    }
}

/// Starts the Command Line Tools installer. Apple's installer is a GUI
/// dialog, so the command returns before the tools exist.
pub fn install_macos(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME)
        .guidance("Finish the Command Line Tools dialog that macOS opened, then run `dev install compilers` again.")
        .run(
            || Compilers.is_present(ctx),
            || {
                ctx.run_checked(CommandSpec::new("xcode-select").arg("--install"))?;
                log_info!("Follow the {} dialog to complete the install.", "Command Line Tools".bold());
                Ok(())
            },
        )
}

pub fn install_ubuntu(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| Compilers.is_present(ctx), || apt_install(ctx, "build-essential"))
}

pub fn install_amazon_linux(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(
        || Compilers.is_present(ctx),
        || {
            let dnf = ctx.dnf();
            require_manager(&dnf, "Neither dnf nor yum was found on PATH.")?;
            let result = dnf.install_group(DEV_TOOLS_GROUP, &InstallOptions::with_timeout(ctx.default_timeout()));
            if result.success {
                Ok(())
            } else {
                Err(InstallError::adapter_failed(
                    &format!("{} groupinstall \"{DEV_TOOLS_GROUP}\"", dnf.name()),
                    &result,
                ))
            }
        },
    )
}

/// Visual Studio Build Tools through winget. The download is several GB, so
/// this runs with the extended timeout.
pub fn install_windows(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME)
        .guidance("Open a new \"Developer Command Prompt for VS 2022\" to use the MSVC toolchain.")
        .run(
            || Compilers.is_present(ctx),
            || {
                let winget = ctx.winget();
                require_manager(&winget, "Install App Installer from the Microsoft Store to get winget.")?;
                log_warn!("Visual Studio Build Tools is a large download; this can take a long time.");
                let options = InstallOptions {
                    extra_args: vec!["--override".to_string(), VS_WORKLOADS.to_string()],
                    ..InstallOptions::with_timeout(ctx.extended_timeout())
                };
                install_package(&winget, VS_BUILD_TOOLS, &options)
            },
        )
}

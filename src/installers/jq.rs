use crate::installers::{
    Tool, apt_install, brew_install, dnf_install, in_user_bin, install_user_binary, windows_install,
};
use crate::libs::context::InstallContext;
use crate::libs::dispatch::PlatformInstaller;
use crate::libs::lifecycle::{InstallError, InstallOutcome, Steps};
use crate::libs::utilities::platform::ArchFamily;
use crate::schemas::platform::PlatformKind;

pub struct Jq;

const NAME: &str = "jq";

impl Tool for Jq {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Command-line JSON processor"
    }

    fn installer_for(&self, kind: &PlatformKind) -> Option<PlatformInstaller> {
        match kind {
            PlatformKind::Macos => Some(install_macos),
            PlatformKind::Ubuntu | PlatformKind::Debian | PlatformKind::Wsl | PlatformKind::Raspbian => {
                Some(install_ubuntu)
            }
            PlatformKind::AmazonLinux | PlatformKind::Rhel | PlatformKind::Fedora => Some(install_amazon_linux),
            PlatformKind::Windows => Some(install_windows),
            PlatformKind::GitBash => Some(install_gitbash),
            PlatformKind::Unsupported(_) => None,
        }
    }

    fn is_present(&self, ctx: &InstallContext<'_>) -> bool {
        ctx.shell.command_exists(NAME) || in_user_bin(ctx, "jq.exe")
    }
}

pub fn install_macos(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| Jq.is_present(ctx), || brew_install(ctx, "jq", false))
}

pub fn install_ubuntu(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| Jq.is_present(ctx), || apt_install(ctx, "jq"))
}

pub fn install_amazon_linux(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| Jq.is_present(ctx), || dnf_install(ctx, "jq"))
}

pub fn install_windows(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| Jq.is_present(ctx), || windows_install(ctx, "jq", "jqlang.jq"))
}

/// Git Bash has no package manager of its own; the release `.exe` goes to
/// the user bin dir.
pub fn install_gitbash(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(
        || Jq.is_present(ctx),
        || {
            let url = windows_release_url(&ctx.settings.versions.jq, &ctx.platform.architecture)?;
            install_user_binary(ctx, &url, "jq.exe")?;
            Ok(())
        },
    )
}

/// jq only publishes 64-bit x86 Windows builds.
fn windows_release_url(version: &str, architecture: &str) -> Result<String, InstallError> {
    match ArchFamily::from_machine(architecture) {
        Some(ArchFamily::Amd64) => Ok(format!(
            "https://github.com/jqlang/jq/releases/download/jq-{version}/jq-windows-amd64.exe"
        )),
        _ => Err(InstallError::unsupported_architecture(NAME, architecture)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::test_support::{FakeFetcher, FakeShell, context, platform, sandboxed_settings};
    use crate::schemas::settings::Settings;

    #[test]
    fn ubuntu_with_jq_on_path_is_already_installed() {
        let shell = FakeShell::new().with_command("apt-get").with_command("jq");
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("ubuntu", "x86_64", "apt"), &shell, &fetcher, &settings);

        let outcome = Jq.install(&ctx).unwrap();
        assert!(matches!(outcome, InstallOutcome::AlreadyInstalled));
        assert!(!shell.ran("sudo apt-get install"));
    }

    #[test]
    fn amazon_linux_installs_with_dnf() {
        let shell = FakeShell::new()
            .with_command("dnf")
            .provides("sudo dnf install -y jq", "jq");
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("amazon_linux", "x86_64", "dnf"), &shell, &fetcher, &settings);

        let outcome = Jq.install(&ctx).unwrap();
        assert!(matches!(outcome, InstallOutcome::Installed));
        assert_eq!(shell.calls(), vec!["sudo dnf install -y jq".to_string()]);
    }

    #[test]
    fn second_run_makes_no_install_calls() {
        let shell = FakeShell::new()
            .with_command("apt-get")
            .provides("sudo apt-get install -y jq", "jq");
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("debian", "aarch64", "apt"), &shell, &fetcher, &settings);

        Jq.install(&ctx).unwrap();
        assert_eq!(shell.count("sudo apt-get install"), 1);
        let outcome = Jq.install(&ctx).unwrap();
        assert!(matches!(outcome, InstallOutcome::AlreadyInstalled));
        assert_eq!(shell.count("sudo apt-get install"), 1);
    }

    #[test]
    fn unsupported_os_is_not_available_and_runs_nothing() {
        let shell = FakeShell::new();
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("unsupported_os", "x86_64", "none"), &shell, &fetcher, &settings);

        let outcome = Jq.install(&ctx).unwrap();
        assert!(matches!(outcome, InstallOutcome::NotAvailable));
        assert!(shell.calls().is_empty());
        assert!(fetcher.urls().is_empty());
    }

    #[test]
    fn apt_exit_zero_without_binary_fails_verification() {
        let shell = FakeShell::new().with_command("apt-get");
        let fetcher = FakeFetcher::new();
        let settings = Settings::default();
        let ctx = context(platform("ubuntu", "x86_64", "apt"), &shell, &fetcher, &settings);

        let outcome = Jq.install(&ctx).unwrap();
        assert!(matches!(
            outcome,
            InstallOutcome::Failed(InstallError::VerificationFailed { .. })
        ));
    }

    #[test]
    fn gitbash_downloads_the_windows_build() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sandboxed_settings(dir.path());
        let shell = FakeShell::new();
        let fetcher = FakeFetcher::new();
        let ctx = context(platform("gitbash", "x86_64", "winget"), &shell, &fetcher, &settings);

        let outcome = install_gitbash(&ctx).unwrap();
        assert!(matches!(outcome, InstallOutcome::Installed));
        assert_eq!(
            fetcher.urls(),
            vec!["https://github.com/jqlang/jq/releases/download/jq-1.7.1/jq-windows-amd64.exe".to_string()]
        );
        assert!(dir.path().join("bin").join("jq.exe").is_file());
    }

    #[test]
    fn gitbash_rerun_finds_the_user_bin_copy() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sandboxed_settings(dir.path());
        // PATH never picks up the user bin dir in this shell.
        let shell = FakeShell::new();
        let fetcher = FakeFetcher::new();
        let ctx = context(platform("gitbash", "x86_64", "winget"), &shell, &fetcher, &settings);

        assert!(matches!(Jq.install(&ctx).unwrap(), InstallOutcome::Installed));
        assert!(matches!(Jq.install(&ctx).unwrap(), InstallOutcome::AlreadyInstalled));
        assert_eq!(fetcher.urls().len(), 1);
    }

    #[test]
    fn gitbash_on_arm_downloads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = sandboxed_settings(dir.path());
        let shell = FakeShell::new();
        let fetcher = FakeFetcher::new();
        let ctx = context(platform("gitbash", "ARM64", "winget"), &shell, &fetcher, &settings);

        let outcome = install_gitbash(&ctx).unwrap();
        assert!(matches!(
            outcome,
            InstallOutcome::Failed(InstallError::UnsupportedArchitecture { .. })
        ));
        assert!(fetcher.urls().is_empty());
    }
}

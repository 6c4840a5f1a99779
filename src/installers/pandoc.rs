use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::installers::{
    Tool, apt_install, brew_install, dnf_install, in_user_bin, place_in_user_bin, sudo_install_binary,
    windows_install,
};
use crate::libs::context::InstallContext;
use crate::libs::dispatch::PlatformInstaller;
use crate::libs::downloads::{Download, download};
use crate::libs::lifecycle::{InstallError, InstallOutcome, Steps};
use crate::libs::utilities::binary::find_binary_named;
use crate::libs::utilities::compression::{ArchiveKind, extract_archive};
use crate::libs::utilities::platform::ArchFamily;
use crate::log_debug;
use crate::schemas::platform::PlatformKind;

pub struct Pandoc;

const NAME: &str = "pandoc";
const RELEASES: &str = "https://github.com/jgm/pandoc/releases/download";

impl Tool for Pandoc {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Universal document converter"
    }

    fn installer_for(&self, kind: &PlatformKind) -> Option<PlatformInstaller> {
        match kind {
            PlatformKind::Macos => Some(install_macos),
            PlatformKind::Ubuntu | PlatformKind::Debian | PlatformKind::Wsl | PlatformKind::Raspbian => {
                Some(install_ubuntu)
            }
            // The RHEL and Amazon Linux repositories do not carry pandoc.
            PlatformKind::AmazonLinux | PlatformKind::Rhel => Some(install_amazon_linux),
            PlatformKind::Fedora => Some(install_fedora),
            PlatformKind::Windows => Some(install_windows),
            PlatformKind::GitBash => Some(install_gitbash),
            PlatformKind::Unsupported(_) => None,
        }
    }

    fn is_present(&self, ctx: &InstallContext<'_>) -> bool {
        ctx.shell.command_exists(NAME) || in_user_bin(ctx, "pandoc.exe")
    }
}

pub fn install_macos(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| Pandoc.is_present(ctx), || brew_install(ctx, NAME, false))
}

pub fn install_ubuntu(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| Pandoc.is_present(ctx), || apt_install(ctx, NAME))
}

pub fn install_fedora(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(|| Pandoc.is_present(ctx), || dnf_install(ctx, NAME))
}

pub fn install_windows(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(
        || Pandoc.is_present(ctx),
        || windows_install(ctx, NAME, "JohnMacFarlane.Pandoc"),
    )
}

/// Release tarball, unpacked here and installed to /usr/local/bin.
pub fn install_amazon_linux(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(
        || Pandoc.is_present(ctx),
        || {
            let file_name = linux_asset(&ctx.settings.versions.pandoc, &ctx.platform.architecture)?;
            let url = release_url(&ctx.settings.versions.pandoc, &file_name);
            let archive = download(ctx.fetcher, &url, &file_name)?;
            let extracted = unpack(&archive, &url)?;
            let binary = locate(&extracted, NAME, &url)?;
            sudo_install_binary(ctx, &binary, NAME)
        },
    )
}

/// Release zip, unpacked into the user bin dir.
pub fn install_gitbash(ctx: &InstallContext<'_>) -> Result<InstallOutcome, InstallError> {
    Steps::new(NAME).run(
        || Pandoc.is_present(ctx),
        || {
            let version = &ctx.settings.versions.pandoc;
            if ArchFamily::from_machine(&ctx.platform.architecture) != Some(ArchFamily::Amd64) {
                return Err(InstallError::unsupported_architecture(NAME, &ctx.platform.architecture));
            }
            let file_name = format!("pandoc-{version}-windows-x86_64.zip");
            let url = release_url(version, &file_name);
            let archive = download(ctx.fetcher, &url, &file_name)?;
            let extracted = unpack(&archive, &url)?;
            let binary = locate(&extracted, "pandoc.exe", &url)?;
            place_in_user_bin(ctx, &binary, "pandoc.exe")?;
            Ok(())
        },
    )
}

/// Pandoc ships 64-bit Linux builds only.
fn linux_asset(version: &str, architecture: &str) -> Result<String, InstallError> {
    let arch = match ArchFamily::from_machine(architecture) {
        Some(ArchFamily::Amd64) => "amd64",
        Some(ArchFamily::Arm64) => "arm64",
        _ => return Err(InstallError::unsupported_architecture(NAME, architecture)),
    };
    Ok(format!("pandoc-{version}-linux-{arch}.tar.gz"))
}

fn release_url(version: &str, file_name: &str) -> String {
    format!("{RELEASES}/{version}/{file_name}")
}

// A corrupt archive is a failed download, not an I/O fault on this host.
fn unpack(archive: &Download, url: &str) -> Result<PathBuf, InstallError> {
    let failed = |reason: String| InstallError::DownloadFailed {
        url: url.to_string(),
        reason,
    };
    let file_name = archive
        .path()
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let kind = ArchiveKind::from_file_name(file_name)
        .ok_or_else(|| failed(format!("unrecognised archive type '{file_name}'")))?;
    extract_archive(archive.path(), archive.dir(), kind)
        .map_err(|e| failed(format!("could not unpack archive: {e}")))
}

fn locate(dir: &Path, binary: &str, url: &str) -> Result<PathBuf, InstallError> {
    let found = find_binary_named(dir, binary).ok_or_else(|| InstallError::DownloadFailed {
        url: url.to_string(),
        reason: format!("archive does not contain '{binary}'"),
    })?;
    log_debug!("[Pandoc Installer] Using binary {}", found.display().to_string().green());
    Ok(found)
}

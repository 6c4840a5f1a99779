//! # Platform Detector
//!
//! Works out which host we are running on. Detection is split in two:
//!
//! * [`gather`] reads raw facts from the machine (files, environment, a few
//!   probe commands).
//! * [`describe`] is a pure classification of those facts into a
//!   [`PlatformDescriptor`], so every rule can be tested with fixtures.

use std::env;
use std::fs;
use std::path::Path;

use colored::Colorize;

use crate::libs::shell::Shell;
use crate::schemas::command::CommandSpec;
use crate::schemas::platform::{PlatformDescriptor, PlatformKind};
use crate::{log_debug, log_warn};

/// Operating-system family the binary was compiled for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsFamily {
    Macos,
    Linux,
    Windows,
    Other(String),
}

impl OsFamily {
    pub fn current() -> Self {
        match env::consts::OS {
            "macos" => OsFamily::Macos,
            "linux" => OsFamily::Linux,
            "windows" => OsFamily::Windows,
            other => OsFamily::Other(other.to_string()),
        }
    }
}

/// Raw, unclassified host facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFacts {
    pub os_family: OsFamily,
    /// Contents of `/etc/os-release`.
    pub os_release: Option<String>,
    /// Contents of `/proc/version`.
    pub proc_version: Option<String>,
    /// `/proc/sys/fs/binfmt_misc/WSLInterop` exists.
    pub wsl_interop: bool,
    pub msystem: Option<String>,
    pub ostype: Option<String>,
    /// `uname -m` or `PROCESSOR_ARCHITECTURE`.
    pub machine: String,
    /// `sw_vers -productVersion`.
    pub macos_version: Option<String>,
    pub has_dnf: bool,
    pub has_choco: bool,
}

impl HostFacts {
    /// Facts for a plain Linux host with the given os-release text. Handy as a
    /// starting point for fixtures.
    #[cfg(test)]
    pub fn linux(os_release: &str, machine: &str) -> Self {
        HostFacts {
            os_family: OsFamily::Linux,
            os_release: Some(os_release.to_string()),
            proc_version: None,
            wsl_interop: false,
            msystem: None,
            ostype: None,
            machine: machine.to_string(),
            macos_version: None,
            has_dnf: false,
            has_choco: false,
        }
    }
}

/// Detects the current host.
pub fn detect(shell: &dyn Shell) -> PlatformDescriptor {
    let facts = gather(shell);
    log_debug!("[Platform] Host facts: {:?}", facts);
    let platform = describe(&facts);
    log_debug!(
        "[Platform] Detected {} ({}, package manager: {})",
        platform.kind.to_string().cyan(),
        platform.architecture,
        platform.package_manager.green()
    );
    platform
}

/// Reads the raw facts from the running machine.
pub fn gather(shell: &dyn Shell) -> HostFacts {
    let os_family = OsFamily::current();

    let machine = match os_family {
        OsFamily::Windows => env::var("PROCESSOR_ARCHITECTURE")
            .unwrap_or_else(|_| env::consts::ARCH.to_string()),
        _ => probe_stdout(shell, CommandSpec::new("uname").arg("-m"))
            .unwrap_or_else(|| env::consts::ARCH.to_string()),
    };

    let macos_version = match os_family {
        OsFamily::Macos => probe_stdout(shell, CommandSpec::new("sw_vers").arg("-productVersion")),
        _ => None,
    };

    HostFacts {
        os_release: read_optional(Path::new("/etc/os-release")),
        proc_version: read_optional(Path::new("/proc/version")),
        wsl_interop: Path::new("/proc/sys/fs/binfmt_misc/WSLInterop").exists(),
        msystem: env::var("MSYSTEM").ok(),
        ostype: env::var("OSTYPE").ok(),
        machine,
        macos_version,
        has_dnf: shell.command_exists("dnf"),
        has_choco: shell.command_exists("choco"),
        os_family,
    }
}

/// Classifies host facts. Never fails: hosts we cannot map come back as
/// [`PlatformKind::Unsupported`].
pub fn describe(facts: &HostFacts) -> PlatformDescriptor {
    let arch = facts.machine.trim();
    match &facts.os_family {
        OsFamily::Macos => {
            let platform = PlatformDescriptor::new(PlatformKind::Macos, arch, "brew");
            match facts.macos_version.as_deref() {
                Some(version) => platform.with_os_version(version),
                None => platform,
            }
        }
        OsFamily::Windows => {
            let kind = if is_git_bash(facts) {
                PlatformKind::GitBash
            } else {
                PlatformKind::Windows
            };
            let manager = if facts.has_choco { "choco" } else { "winget" };
            PlatformDescriptor::new(kind, arch, manager)
        }
        OsFamily::Linux => describe_linux(facts, arch),
        OsFamily::Other(os) => PlatformDescriptor::new(PlatformKind::from_id(os), arch, "none"),
    }
}

fn describe_linux(facts: &HostFacts, arch: &str) -> PlatformDescriptor {
    let release = facts.os_release.as_deref().map(OsRelease::parse).unwrap_or_default();
    let redhat_manager = if facts.has_dnf { "dnf" } else { "yum" };

    let kind = if is_wsl(facts) {
        PlatformKind::Wsl
    } else {
        classify_distro(&release)
    };

    let manager = if kind.is_debian_family() {
        "apt"
    } else if kind.is_redhat_family() {
        redhat_manager
    } else {
        log_warn!(
            "[Platform] Unrecognised Linux distribution '{}'",
            release.id.as_deref().unwrap_or("unknown")
        );
        "none"
    };

    let platform = PlatformDescriptor::new(kind, arch, manager);
    match release.version_id.as_deref() {
        Some(version) => platform.with_os_version(version),
        None => platform,
    }
}

fn is_git_bash(facts: &HostFacts) -> bool {
    let msystem = facts
        .msystem
        .as_deref()
        .map(str::to_uppercase)
        .is_some_and(|m| m.starts_with("MINGW") || m.starts_with("MSYS"));
    let ostype = facts
        .ostype
        .as_deref()
        .map(str::to_lowercase)
        .is_some_and(|o| o.starts_with("msys") || o.starts_with("cygwin"));
    msystem || ostype
}

fn is_wsl(facts: &HostFacts) -> bool {
    facts.wsl_interop
        || facts
            .proc_version
            .as_deref()
            .is_some_and(|v| v.to_lowercase().contains("microsoft"))
}

fn classify_distro(release: &OsRelease) -> PlatformKind {
    let Some(id) = release.id.as_deref() else {
        return PlatformKind::Unsupported("linux".to_string());
    };
    if let Some(kind) = kind_for_id(id) {
        return kind;
    }
    // Derivatives (Linux Mint, Pop!_OS, Oracle variants, ...) advertise their
    // parent in ID_LIKE.
    for parent in &release.id_like {
        match parent.as_str() {
            "debian" | "ubuntu" => return PlatformKind::Debian,
            "rhel" | "fedora" | "centos" => return PlatformKind::Rhel,
            _ => {}
        }
    }
    PlatformKind::Unsupported(id.to_string())
}

fn kind_for_id(id: &str) -> Option<PlatformKind> {
    match id {
        "ubuntu" => Some(PlatformKind::Ubuntu),
        "debian" => Some(PlatformKind::Debian),
        "raspbian" => Some(PlatformKind::Raspbian),
        "amzn" => Some(PlatformKind::AmazonLinux),
        "rhel" | "centos" | "rocky" | "almalinux" | "ol" => Some(PlatformKind::Rhel),
        "fedora" => Some(PlatformKind::Fedora),
        _ => None,
    }
}

/// The handful of `/etc/os-release` keys we care about.
#[derive(Debug, Default, PartialEq, Eq)]
struct OsRelease {
    id: Option<String>,
    id_like: Vec<String>,
    version_id: Option<String>,
}

impl OsRelease {
    fn parse(text: &str) -> Self {
        let mut release = OsRelease::default();
        for line in text.lines() {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "ID" => release.id = Some(value.to_lowercase()),
                "ID_LIKE" => {
                    release.id_like = value.split_whitespace().map(str::to_lowercase).collect()
                }
                "VERSION_ID" => release.version_id = Some(value.to_string()),
                _ => {}
            }
        }
        release
    }
}

fn read_optional(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

fn probe_stdout(shell: &dyn Shell, spec: CommandSpec) -> Option<String> {
    shell
        .run(&spec)
        .ok()
        .filter(|r| r.success())
        .map(|r| r.stdout.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::test_support::FakeShell;

    const UBUNTU: &str = r#"NAME="Ubuntu"
VERSION="22.04.4 LTS (Jammy Jellyfish)"
ID=ubuntu
ID_LIKE=debian
VERSION_ID="22.04"
"#;

    const AMAZON: &str = r#"NAME="Amazon Linux"
VERSION="2023"
ID="amzn"
ID_LIKE="fedora"
VERSION_ID="2023"
"#;

    const MINT: &str = r#"NAME="Linux Mint"
ID=linuxmint
ID_LIKE="ubuntu debian"
VERSION_ID="21.3"
"#;

    #[test]
    fn ubuntu_uses_apt() {
        let platform = describe(&HostFacts::linux(UBUNTU, "x86_64"));
        assert_eq!(platform.kind, PlatformKind::Ubuntu);
        assert_eq!(platform.package_manager, "apt");
        assert_eq!(platform.os_version.as_deref(), Some("22.04"));
    }

    #[test]
    fn amazon_linux_prefers_dnf_when_present() {
        let mut facts = HostFacts::linux(AMAZON, "aarch64");
        assert_eq!(describe(&facts).package_manager, "yum");

        facts.has_dnf = true;
        let platform = describe(&facts);
        assert_eq!(platform.kind, PlatformKind::AmazonLinux);
        assert_eq!(platform.package_manager, "dnf");
        assert_eq!(platform.architecture, "aarch64");
    }

    #[test]
    fn rhel_clones_map_to_rhel() {
        for id in ["rhel", "centos", "rocky", "almalinux", "ol"] {
            let facts = HostFacts::linux(&format!("ID={id}\n"), "x86_64");
            assert_eq!(describe(&facts).kind, PlatformKind::Rhel, "{id}");
        }
    }

    #[test]
    fn unknown_id_falls_back_to_id_like() {
        let platform = describe(&HostFacts::linux(MINT, "x86_64"));
        assert_eq!(platform.kind, PlatformKind::Debian);
        assert_eq!(platform.package_manager, "apt");
    }

    #[test]
    fn unknown_distribution_is_unsupported_with_its_id() {
        let platform = describe(&HostFacts::linux("ID=arch\n", "x86_64"));
        assert_eq!(platform.kind, PlatformKind::Unsupported("arch".to_string()));
        assert_eq!(platform.package_manager, "none");
    }

    #[test]
    fn microsoft_kernel_is_wsl() {
        let mut facts = HostFacts::linux(UBUNTU, "x86_64");
        facts.proc_version = Some("Linux version 5.15.153.1-microsoft-standard-WSL2".to_string());
        let platform = describe(&facts);
        assert_eq!(platform.kind, PlatformKind::Wsl);
        assert_eq!(platform.package_manager, "apt");
    }

    #[test]
    fn windows_variants() {
        let mut facts = HostFacts::linux("", "AMD64");
        facts.os_release = None;
        facts.os_family = OsFamily::Windows;
        assert_eq!(describe(&facts).kind, PlatformKind::Windows);
        assert_eq!(describe(&facts).package_manager, "winget");

        facts.has_choco = true;
        facts.msystem = Some("MINGW64".to_string());
        let platform = describe(&facts);
        assert_eq!(platform.kind, PlatformKind::GitBash);
        assert_eq!(platform.package_manager, "choco");
    }

    #[test]
    fn macos_carries_product_version() {
        let mut facts = HostFacts::linux("", "arm64");
        facts.os_family = OsFamily::Macos;
        facts.macos_version = Some("14.5".to_string());
        let platform = describe(&facts);
        assert_eq!(platform.kind, PlatformKind::Macos);
        assert_eq!(platform.package_manager, "brew");
        assert_eq!(platform.os_version.as_deref(), Some("14.5"));
    }

    #[test]
    fn gather_uses_uname_for_architecture() {
        if OsFamily::current() == OsFamily::Windows {
            return;
        }
        let shell = FakeShell::new().respond("uname -m", 0, "aarch64\n").with_command("dnf");
        let facts = gather(&shell);
        assert_eq!(facts.machine, "aarch64");
        assert!(facts.has_dnf);
        assert!(!facts.has_choco);
    }
}

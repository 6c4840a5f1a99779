//! # Platform Schema
//!
//! The platform descriptor is computed once per run by the detector and then
//! handed to every installer. Installers `match` on [`PlatformKind`] to pick a
//! platform function, so adding a kind forces every dispatch table to decide
//! what to do with it.

use serde::{Serialize, Serializer};
use std::fmt;

/// The host families `dev install` knows how to serve.
///
/// `Unsupported` carries the raw identifier of a host we could not map (for
/// example the `ID` of an unknown Linux distribution) so messages can name it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Macos,
    Ubuntu,
    Debian,
    Wsl,
    Raspbian,
    AmazonLinux,
    Rhel,
    Fedora,
    Windows,
    GitBash,
    Unsupported(String),
}

impl PlatformKind {
    /// Snake-case identifier, as printed in messages and JSON.
    pub fn as_str(&self) -> &str {
        match self {
            PlatformKind::Macos => "macos",
            PlatformKind::Ubuntu => "ubuntu",
            PlatformKind::Debian => "debian",
            PlatformKind::Wsl => "wsl",
            PlatformKind::Raspbian => "raspbian",
            PlatformKind::AmazonLinux => "amazon_linux",
            PlatformKind::Rhel => "rhel",
            PlatformKind::Fedora => "fedora",
            PlatformKind::Windows => "windows",
            PlatformKind::GitBash => "gitbash",
            PlatformKind::Unsupported(raw) => raw,
        }
    }

    /// Parses a snake-case identifier. Anything unknown becomes `Unsupported`.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_lowercase().as_str() {
            "macos" => PlatformKind::Macos,
            "ubuntu" => PlatformKind::Ubuntu,
            "debian" => PlatformKind::Debian,
            "wsl" => PlatformKind::Wsl,
            "raspbian" => PlatformKind::Raspbian,
            "amazon_linux" => PlatformKind::AmazonLinux,
            "rhel" => PlatformKind::Rhel,
            "fedora" => PlatformKind::Fedora,
            "windows" => PlatformKind::Windows,
            "gitbash" => PlatformKind::GitBash,
            other => PlatformKind::Unsupported(other.to_string()),
        }
    }

    /// Debian-derived hosts that use APT.
    pub fn is_debian_family(&self) -> bool {
        matches!(
            self,
            PlatformKind::Ubuntu | PlatformKind::Debian | PlatformKind::Wsl | PlatformKind::Raspbian
        )
    }

    /// Red Hat-derived hosts that use DNF or YUM.
    pub fn is_redhat_family(&self) -> bool {
        matches!(
            self,
            PlatformKind::AmazonLinux | PlatformKind::Rhel | PlatformKind::Fedora
        )
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PlatformKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Everything an installer needs to know about the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformDescriptor {
    #[serde(rename = "type")]
    pub kind: PlatformKind,
    /// Raw machine string, e.g. `x86_64`, `aarch64`, `armv7l`.
    pub architecture: String,
    /// Name of the native package manager binary (`brew`, `apt`, `dnf`, ...).
    pub package_manager: String,
    /// Product version for macOS, `VERSION_ID` on Linux. Used for version gates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
}

impl PlatformDescriptor {
    pub fn new(kind: PlatformKind, architecture: &str, package_manager: &str) -> Self {
        PlatformDescriptor {
            kind,
            architecture: architecture.to_string(),
            package_manager: package_manager.to_string(),
            os_version: None,
        }
    }

    pub fn with_os_version(mut self, version: &str) -> Self {
        self.os_version = Some(version.to_string());
        self
    }
}

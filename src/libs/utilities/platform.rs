// Architecture and version helpers shared by the download-based installers.

use colored::Colorize;
use semver::Version;

use crate::log_debug;

/// CPU families that vendors publish separate binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchFamily {
    /// x86_64 / amd64
    Amd64,
    /// aarch64 / arm64
    Arm64,
    /// 32-bit ARM (armv7l, armv6l, armhf)
    Arm32,
}

impl ArchFamily {
    /// Maps a raw machine string (`uname -m`, `PROCESSOR_ARCHITECTURE`) to a
    /// family. Anything else (i686, riscv64, s390x, ...) is `None`.
    pub fn from_machine(machine: &str) -> Option<Self> {
        let family = match machine.trim().to_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Some(ArchFamily::Amd64),
            "aarch64" | "arm64" | "armv8l" => Some(ArchFamily::Arm64),
            "armv7l" | "armv7" | "armv6l" | "armhf" | "arm" => Some(ArchFamily::Arm32),
            _ => None,
        };
        log_debug!(
            "[Utils] Machine '{}' maps to {:?}",
            machine.cyan(),
            family
        );
        family
    }
}

/// Lenient version parsing: `go1.22`, `v4.44.6`, `14.5`, `1.24rc1` all parse.
/// Missing minor/patch components are zero; pre-release suffixes are dropped.
pub fn parse_lenient_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim().trim_start_matches("go").trim_start_matches('v');
    let numeric: Vec<u64> = trimmed
        .split('.')
        .take(3)
        .map_while(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .collect();
    match numeric.as_slice() {
        [major] => Some(Version::new(*major, 0, 0)),
        [major, minor] => Some(Version::new(*major, *minor, 0)),
        [major, minor, patch] => Some(Version::new(*major, *minor, *patch)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_strings_map_to_families() {
        assert_eq!(ArchFamily::from_machine("x86_64"), Some(ArchFamily::Amd64));
        assert_eq!(ArchFamily::from_machine("AMD64"), Some(ArchFamily::Amd64));
        assert_eq!(ArchFamily::from_machine("aarch64"), Some(ArchFamily::Arm64));
        assert_eq!(ArchFamily::from_machine("armv7l"), Some(ArchFamily::Arm32));
        assert_eq!(ArchFamily::from_machine("riscv64"), None);
    }

    #[test]
    fn lenient_versions() {
        assert_eq!(parse_lenient_version("go1.22"), Some(Version::new(1, 22, 0)));
        assert_eq!(parse_lenient_version("1.24rc1"), Some(Version::new(1, 24, 0)));
        assert_eq!(parse_lenient_version("v4.44.6"), Some(Version::new(4, 44, 6)));
        assert_eq!(parse_lenient_version("14.5"), Some(Version::new(14, 5, 0)));
        assert_eq!(parse_lenient_version("devel"), None);
    }
}

// Small, dependency-light helpers used by the installers.

// Locating, moving and chmod-ing downloaded binaries.
pub mod binary;
// Unpacking of release archives.
pub mod compression;
// `~` / `$VAR` expansion for configured paths.
pub mod path_helpers;
// Architecture families and lenient version parsing.
pub mod platform;

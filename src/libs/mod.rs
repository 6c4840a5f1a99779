// Settings file loading.
pub mod config_loading;
// Per-run bundle handed to every platform installer.
pub mod context;
// Platform-table lookup and "not available" handling.
pub mod dispatch;
// Release downloads into scratch directories.
pub mod downloads;
// Check → install → verify state machine and the install error type.
pub mod lifecycle;
// Config path resolution.
pub mod paths;
// Host classification.
pub mod platform_detector;
// Subprocess execution with timeouts.
pub mod shell;
// Idempotent PATH exports in shell profiles.
pub mod shell_profile;
pub mod utilities;

#[cfg(test)]
pub mod test_support;

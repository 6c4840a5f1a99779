// This file implements the application's logging system.
// It provides macros for the INFO, WARN, ERROR and DEBUG levels with colored
// prefixes. Progress (INFO) is written to stdout so it can be piped, everything
// else goes to stderr.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

// `log_info!` for installer progress and results.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        use colored::Colorize as _;
        println!("{} {}", "[INFO]".bright_green(), format!($($arg)*))
    }};
}

// `log_warn!` for non-fatal conditions the user should know about.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        use colored::Colorize as _;
        eprintln!("{} {}", "[WARN]".bright_yellow(), format!($($arg)*))
    }};
}

// `log_error!` for failed installs and anything the user must act on.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        use colored::Colorize as _;
        eprintln!("{} {}", "[ERROR]".bright_red(), format!($($arg)*))
    }};
}

// `log_debug!` only prints when `--debug` was passed.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if $crate::logger::is_debug_enabled() {
            use colored::Colorize as _;
            eprintln!("{} {}", "[DEBUG]".dimmed(), format!($($arg)*));
        }
    }};
}

// Global flag to control debug logging, initialized once.
static DEBUG_ENABLED: OnceLock<AtomicBool> = OnceLock::new();

/// Initializes the logger, setting the global debug mode.
/// Call once at startup, before any installer runs.
///
/// # Arguments
/// * `debug`: If `true`, `log_debug!` output is printed.
pub fn init(debug: bool) {
    DEBUG_ENABLED
        .get_or_init(|| AtomicBool::new(debug))
        .store(debug, Ordering::Relaxed);

    if debug {
        log_debug!("Logger initialized in DEBUG mode");
    }
}

/// Checks if debug logging is currently enabled.
/// Defaults to `false` if `init` was never called (e.g. in unit tests).
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED
        .get()
        .map(|f| f.load(Ordering::Relaxed))
        .unwrap_or(false)
}

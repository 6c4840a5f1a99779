// This file handles the `dev version` command.

use crate::log_info;
use colored::Colorize;

// Baked in at compile time, so the binary reports its own version no matter
// which directory it runs from.
const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() {
    log_info!("dev {}", VERSION.bold());
}

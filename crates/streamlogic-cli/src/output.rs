//! Output formatting and colorization

use colored::*;

/// Print success message
pub fn print_success(msg: &str) {
    eprintln!("{} {}", "✓".green().bold(), msg);
}

/// Print error message
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg.red());
}

/// Print info message
pub fn print_info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), msg);
}

/// Print section header
pub fn print_header(title: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", "=".repeat(title.len()).cyan());
}

/// Enable/disable colored output
pub fn enable_colors(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}

//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR): green for success, red for errors,
//! yellow for warnings, cyan for hints and paths, bold for values.

use colored::Colorize;
use std::fmt::Display;

const RULE_WIDTH: usize = 48;

fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a success message with checkmark.
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", "✓".green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// Print an error message to stderr.
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✗".red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message.
pub fn warn(msg: &str) {
    if colors_enabled() {
        println!("{} {}", "⚠".yellow(), msg);
    } else {
        println!("⚠ {}", msg);
    }
}

/// Print a hint message to stderr.
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "→".cyan(), msg.cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a key-value pair, label dimmed.
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        println!("  {}  {}", label.dimmed(), value.to_string().bold());
    } else {
        println!("  {}  {}", label, value);
    }
}

/// Print a dimmed/secondary message.
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        println!("{}", msg.dimmed());
    } else {
        println!("{}", msg);
    }
}

/// Print a section header followed by a rule.
pub fn section(title: &str) {
    println!();
    if colors_enabled() {
        println!("{}", title.bold());
        println!("{}", "─".repeat(RULE_WIDTH).dimmed());
    } else {
        println!("{}", title);
        println!("{}", "─".repeat(RULE_WIDTH));
    }
}

/// Format a path for inline display.
pub fn path(p: &str) -> String {
    if colors_enabled() {
        p.cyan().to_string()
    } else {
        p.to_string()
    }
}

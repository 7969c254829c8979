//! Terminal output.
//!
//! All user-facing reporting goes through these helpers. `quiet` suppresses
//! informational lines, `verbose` enables step-by-step pipeline tracing.
//! Warnings and errors are always written to stderr.

use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn header(title: &str) {
    if is_quiet() {
        return;
    }
    println!("\n{}", title.bold().underline());
}

pub fn success(msg: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", "✓".green().bold(), msg);
}

pub fn info(msg: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", "ℹ".blue().bold(), msg);
}

/// Step tracing, only shown with `--verbose`.
pub fn verbose(msg: &str) {
    if !is_verbose() {
        return;
    }
    eprintln!("{} {}", "·".bright_black(), msg.bright_black());
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

pub fn separator() {
    if is_quiet() {
        return;
    }
    println!("{}", "─".repeat(60).bright_black());
}

pub fn keyval(key: &str, val: &str) {
    println!("{}: {}", key.bold(), val);
}

pub fn indent(msg: &str, level: usize) {
    let spaces = " ".repeat(level * 2);
    println!("{}{}", spaces, msg);
}

/// Like [`indent`], but on stderr so it stays attached to a preceding warning.
pub fn indent_err(msg: &str, level: usize) {
    let spaces = " ".repeat(level * 2);
    eprintln!("{}{}", spaces, msg);
}

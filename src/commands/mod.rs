//! Command implementations and shared terminal output helpers.

/// Mirror refresh and delegation for every non-offworld command.
pub mod passthrough;

/// Restore tracked files from the repository mirror to disk.
pub mod sync;

/// Mirror files into the repository and start tracking them.
pub mod track;

use crate::delegate::{DELEGATE_TOOL, Delegate, InvocationMode};
use colored::Colorize;

/// Prints a success line to stdout.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error line to stderr.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning line to stdout.
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints the usage text.
///
/// Under the delegate's alias the real tool's own usage is shown first and
/// the offworld commands are appended to it. Error paths pass
/// [`InvocationMode::Wrapper`] explicitly so a failed offworld command
/// never prints the delegate's usage.
pub fn print_usage(mode: InvocationMode, delegate: &Delegate) {
    if mode == InvocationMode::Alias {
        let _ = delegate.invoke(&[]);
        println!("\nOffworld commands:");
    } else {
        println!("usage: ow <command>, or any {DELEGATE_TOOL} command to pass through");
        println!("\nCOMMANDS");
    }
    println!("  track <paths...>\tTrack the files using offworld");
    println!("  status\t\tRefresh mirrors, then show {DELEGATE_TOOL} status");
    println!("  sync\t\t\tSync all the files to their on-disk location");
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use offworld::delegate::{Delegate, InvocationMode};
use offworld::{OffworldContext, commands};
use std::ffi::OsString;
use std::process;

#[derive(Parser)]
#[command(
    name = "ow",
    version = offworld::VERSION,
    about = "Track scattered config files inside a single git repository",
    long_about = "Offworld mirrors tracked files into a namespaced area of a git \
                  repository and otherwise passes every command through to git",
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror files into the repository and start tracking them
    Track {
        /// Paths to track
        paths: Vec<String>,
    },

    /// Write every unprotected tracked file back to its on-disk location
    Sync,

    /// Refresh repository mirrors, then show the delegate's status
    Status {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },

    #[command(external_subcommand)]
    External(Vec<OsString>),
}

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let program = std::env::args_os().next().unwrap_or_default();
    let ctx = OffworldContext::new(InvocationMode::detect(&program))?;
    let delegate = Delegate::resolve()?;

    // Flag-leading invocations can never be offworld commands; hand the
    // vector to the delegate unmodified.
    let raw: Vec<OsString> = std::env::args_os().skip(1).collect();
    if raw
        .first()
        .is_some_and(|arg| arg.to_string_lossy().starts_with('-'))
    {
        return commands::passthrough::execute(&ctx, &delegate, &raw, false);
    }

    match Cli::parse().command {
        None => {
            commands::print_usage(ctx.mode, &delegate);
            Ok(0)
        }
        Some(Commands::Track { paths }) => commands::track::execute(&ctx, &delegate, &paths),
        Some(Commands::Sync) => commands::sync::execute(&ctx, &delegate),
        Some(Commands::Status { args }) => {
            let mut argv = vec![OsString::from("status")];
            argv.extend(args);
            commands::passthrough::execute(&ctx, &delegate, &argv, true)
        }
        Some(Commands::External(args)) => {
            commands::passthrough::execute(&ctx, &delegate, &args, false)
        }
    }
}

//! Track files: mirror them into the repository and record them in the
//! manifest.
//!
//! Validation is all-or-nothing: every given path must be a readable
//! regular file before anything is mirrored or the manifest is touched.
//! The mirror loop itself may partially complete before a late failure;
//! each file's mirror and stage step is independently re-runnable.

use crate::commands::{print_error, print_success, print_usage, print_warning};
use crate::delegate::{Delegate, InvocationMode};
use crate::manifest::Manifest;
use crate::mapping::TrackedFile;
use crate::sync::{self, Syncer};
use crate::{MANIFEST_FILE, OffworldContext};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Runs `track` for the given paths and returns the process exit code.
///
/// # Errors
/// Returns an error if the manifest cannot be loaded or persisted, or if a
/// mirror or stage step fails after validation passed.
pub fn execute(ctx: &OffworldContext, delegate: &Delegate, paths: &[String]) -> Result<i32> {
    if !ctx.is_work_tree() {
        print_error(&format!(
            "not inside a git work tree: {}",
            ctx.repo_root.display()
        ));
        print_usage(InvocationMode::Wrapper, delegate);
        return Ok(1);
    }

    if paths.is_empty() {
        print_usage(InvocationMode::Wrapper, delegate);
        return Ok(1);
    }

    let mut manifest = Manifest::load(&ctx.repo_root)?;

    // Validate everything before mutating anything.
    let mut files = Vec::with_capacity(paths.len());
    for raw in paths {
        let file = TrackedFile::from_path(Path::new(raw), &ctx.home_dir)?;
        if !file.disk_path().is_file() {
            print_error(&format!("cannot track non-existent file: {raw}"));
            return Ok(1);
        }
        if !sync::exists(&file) {
            print_error(&format!("cannot track non-readable file: {raw}"));
            return Ok(1);
        }
        files.push(file);
    }

    let syncer = Syncer::new(&ctx.repo_root, delegate);
    for file in &files {
        let protected = sync::is_protected(file);
        if protected {
            print_warning(&format!(
                "{} is not writable, sync will leave it untouched",
                file.name()
            ));
        }

        syncer.mirror_to_repository(file)?;
        manifest.insert(file.name().to_string(), protected);
        println!("  {} {}", "tracked:".green(), file.name());
    }

    manifest.save(&ctx.repo_root)?;
    delegate.stage(&ctx.repo_root, Path::new(MANIFEST_FILE))?;

    print_success(&format!("{} file(s) tracked", files.len()));
    Ok(0)
}

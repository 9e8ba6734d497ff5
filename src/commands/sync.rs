//! Sync: force every unprotected tracked file back to its on-disk
//! location.
//!
//! Sync is intentionally destructive: whatever the repository mirror holds
//! overwrites the disk copy, byte for byte. Entries recorded as protected
//! at track time are never written. The first write failure aborts the
//! command; remaining files are not attempted.

use crate::OffworldContext;
use crate::commands::{print_error, print_usage};
use crate::delegate::{Delegate, InvocationMode};
use crate::manifest::Manifest;
use crate::mapping::TrackedFile;
use crate::sync::Syncer;
use anyhow::Result;

/// Runs `sync` and returns the process exit code.
///
/// # Errors
/// Returns an error on the first failed restore; the error names the file
/// that could not be written.
pub fn execute(ctx: &OffworldContext, delegate: &Delegate) -> Result<i32> {
    if !ctx.is_work_tree() {
        print_error(&format!(
            "not inside a git work tree: {}",
            ctx.repo_root.display()
        ));
        print_usage(InvocationMode::Wrapper, delegate);
        return Ok(1);
    }

    let manifest = Manifest::load(&ctx.repo_root)?;
    let syncer = Syncer::new(&ctx.repo_root, delegate);

    for (name, protected) in manifest.entries() {
        if protected {
            continue;
        }
        let file = TrackedFile::from_name(name, &ctx.home_dir);
        syncer.restore_to_disk(&file)?;
        println!("synced {} -> {}", file.repo_path().display(), name);
    }

    Ok(0)
}

//! Passthrough: refresh every repository mirror, then hand the argument
//! vector to the real delegate.
//!
//! Every command that is not an offworld command lands here, as does
//! `status`, which always delegates regardless of how the process was
//! invoked. The refresh is unconditional and strict: every manifest entry
//! is mirrored regardless of its protected flag, and a tracked file
//! missing from disk aborts the command rather than being skipped.

use crate::OffworldContext;
use crate::delegate::{Delegate, InvocationMode};
use crate::manifest::Manifest;
use crate::mapping::TrackedFile;
use crate::sync::Syncer;
use anyhow::Result;
use std::ffi::OsString;

/// Refreshes all mirrors, then delegates when the process runs under the
/// delegate's alias or when `force_delegate` is set (the `status` path).
/// Returns the delegate's exit code, or 0 when no delegation happens.
///
/// # Errors
/// Returns an error if any mirror refresh fails or the delegate cannot be
/// spawned.
pub fn execute(
    ctx: &OffworldContext,
    delegate: &Delegate,
    args: &[OsString],
    force_delegate: bool,
) -> Result<i32> {
    let manifest = Manifest::load(&ctx.repo_root)?;
    let syncer = Syncer::new(&ctx.repo_root, delegate);

    for (name, _) in manifest.entries() {
        let file = TrackedFile::from_name(name, &ctx.home_dir);
        syncer.mirror_to_repository(&file)?;
    }

    if force_delegate || ctx.mode == InvocationMode::Alias {
        return delegate.invoke(args);
    }

    Ok(0)
}

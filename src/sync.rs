//! Physical synchronization between disk locations and the repository
//! mirror tree.
//!
//! The synchronizer is a thin service over immutable [`TrackedFile`]
//! values: it owns the two copy directions (disk into the mirror, mirror
//! back onto disk) and nothing else. Mirroring always stages the mirror
//! path with the delegate so the repository view stays current. Both
//! directions preserve permissions and modification times where the
//! platform supports it, and directory creation is idempotent.

use crate::delegate::Delegate;
use crate::mapping::TrackedFile;
use crate::utils::ensure_parent_dirs;
use anyhow::{Context, Result};
use filetime::FileTime;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Copy service between disk locations and the repository mirror.
pub struct Syncer<'a> {
    repo_root: &'a Path,
    delegate: &'a Delegate,
}

impl<'a> Syncer<'a> {
    /// Creates a synchronizer for the given repository root.
    #[must_use]
    pub const fn new(repo_root: &'a Path, delegate: &'a Delegate) -> Self {
        Self {
            repo_root,
            delegate,
        }
    }

    /// Copies the file's disk content into its repository mirror location
    /// and stages the mirror with the delegate.
    ///
    /// # Errors
    /// Returns an error if the disk file cannot be read, the mirror cannot
    /// be written, or staging fails. The failure propagates and aborts the
    /// enclosing command.
    pub fn mirror_to_repository(&self, file: &TrackedFile) -> Result<()> {
        let mirror = self.repo_root.join(file.repo_path());
        ensure_parent_dirs(&mirror)?;

        fs::copy(file.disk_path(), &mirror).with_context(|| {
            format!(
                "Failed to mirror {} into the repository",
                file.disk_path().display()
            )
        })?;
        copy_file_times(file.disk_path(), &mirror)?;
        debug!(name = %file.name(), "mirrored into repository");

        self.delegate.stage(self.repo_root, file.repo_path())
    }

    /// Copies the repository mirror content back onto the file's disk
    /// location. Only ever called for unprotected entries.
    ///
    /// # Errors
    /// Returns an error if the mirror cannot be read or the disk location
    /// cannot be written.
    pub fn restore_to_disk(&self, file: &TrackedFile) -> Result<()> {
        let mirror = self.repo_root.join(file.repo_path());
        ensure_parent_dirs(file.disk_path())?;

        fs::copy(&mirror, file.disk_path())
            .with_context(|| format!("Failed to write {}", file.name()))?;
        copy_file_times(&mirror, file.disk_path())?;
        debug!(name = %file.name(), "restored to disk");

        Ok(())
    }
}

/// Whether the file is write-protected for the tracking process.
///
/// Evaluated against the live filesystem at track time only; afterwards
/// the manifest's stored flag is authoritative.
#[must_use]
pub fn is_protected(file: &TrackedFile) -> bool {
    fs::metadata(file.disk_path()).map_or(true, |meta| meta.permissions().readonly())
}

/// Whether the disk location is a regular, readable file.
#[must_use]
pub fn exists(file: &TrackedFile) -> bool {
    file.disk_path().is_file() && fs::File::open(file.disk_path()).is_ok()
}

fn copy_file_times(from: &Path, to: &Path) -> Result<()> {
    let meta = fs::metadata(from)
        .with_context(|| format!("Failed to read metadata for {}", from.display()))?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(to, atime, mtime)
        .with_context(|| format!("Failed to set timestamps on {}", to.display()))
}

//! Path identity mapping between disk locations and repository mirror
//! locations.
//!
//! Every tracked file has three canonical forms derived from one another:
//!
//! - the **name**, how the file is displayed and stored in the manifest,
//!   with the home directory abbreviated to a literal `~`
//! - the **disk path**, the fully resolved location where the file lives
//! - the **repo path**, the mirror location inside the repository's
//!   `offworld/` namespace
//!
//! The mapping is pure and deterministic: equal names always produce equal
//! disk and repository locations, and distinct names never share a mirror
//! location. `.` and `..` segments are folded lexically before the home
//! prefix is abbreviated, so differently spelled inputs for the same file
//! canonicalize identically. The home directory itself is never folded to
//! `~`; only paths strictly inside it are.

use crate::utils::{expand_tilde, make_absolute, normalize_lexically};
use crate::{HOME_MIRROR_DIR, MIRROR_DIR};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// A file tracked by offworld.
///
/// Transient, immutable value constructed on demand from a user-supplied
/// path or a manifest name. Carries no state beyond the three canonical
/// forms of its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    name: String,
    disk_path: PathBuf,
    repo_path: PathBuf,
}

impl TrackedFile {
    /// Builds a tracked file from a path given on the command line.
    ///
    /// A literal `~` prefix is expanded against `home`, relative paths are
    /// resolved from the working directory, and the result is normalized
    /// lexically before the home prefix is folded back to `~`.
    ///
    /// # Errors
    /// Returns an error if a relative path is given and the working
    /// directory cannot be determined.
    pub fn from_path(path: &Path, home: &Path) -> Result<Self> {
        let absolute = normalize_lexically(&make_absolute(&expand_tilde(path, home))?);
        let name = match absolute.strip_prefix(home) {
            Ok(rel) if !rel.as_os_str().is_empty() => format!("~/{}", rel.display()),
            _ => absolute.display().to_string(),
        };
        Ok(Self::assemble(name, home))
    }

    /// Builds a tracked file from a canonical name read from the manifest.
    #[must_use]
    pub fn from_name(name: &str, home: &Path) -> Self {
        Self::assemble(name.to_string(), home)
    }

    fn assemble(name: String, home: &Path) -> Self {
        let (disk_path, repo_path) = match name.strip_prefix("~/") {
            Some(rel) => (
                home.join(rel),
                Path::new(MIRROR_DIR).join(HOME_MIRROR_DIR).join(rel),
            ),
            None => {
                let disk = PathBuf::from(&name);
                let rel = disk.strip_prefix("/").unwrap_or(&disk).to_path_buf();
                (disk, Path::new(MIRROR_DIR).join(rel))
            }
        };
        Self {
            name,
            disk_path,
            repo_path,
        }
    }

    /// Canonical display identity, with the home directory abbreviated
    /// to `~`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully resolved location where the file lives on disk.
    #[must_use]
    pub fn disk_path(&self) -> &Path {
        &self.disk_path
    }

    /// Mirror location inside the repository, relative to its root.
    #[must_use]
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }
}

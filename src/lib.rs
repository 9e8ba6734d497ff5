#![warn(missing_docs)]

//! # Offworld - Scattered Config Tracking
//!
//! Offworld manages git repositories whose files are dispersed across a
//! filesystem. Tracked files keep living at their real locations (home
//! directory, system config paths) while a byte-for-byte mirror of each one
//! is kept inside a namespaced area of the repository. Everything that is
//! not an offworld command is handed to the real git, so the repository
//! stays an ordinary git repository throughout.
//!
//! ## Architecture
//!
//! - [`mapping`]: the pure path-identity mapping between a file's on-disk
//!   location and its mirrored repository location
//! - [`manifest`]: the persisted set of tracked names and their
//!   write-protection flags
//! - [`sync`]: the physical copy operations between disk and mirror
//! - [`delegate`]: locating and invoking the real git executable
//! - [`commands`]: the track / sync / passthrough command implementations

/// Command implementations (track, sync, passthrough).
pub mod commands;

/// Resolution and invocation of the wrapped version-control tool.
pub mod delegate;

/// Persisted mapping of tracked names to their protection flags.
pub mod manifest;

/// Path identity mapping between disk and repository mirror locations.
pub mod mapping;

/// Physical synchronization between disk locations and the mirror tree.
pub mod sync;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::delegate::InvocationMode;

/// Current version of the offworld binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the manifest file at the repository root.
pub const MANIFEST_FILE: &str = ".offworld";

/// Top-level directory inside the repository that holds every mirror.
pub const MIRROR_DIR: &str = "offworld";

/// Mirror subdirectory that stands in for the home directory.
pub const HOME_MIRROR_DIR: &str = "_home_";

/// Central context for all offworld operations.
///
/// Holds the repository root (the invocation's working directory), the
/// resolved home directory used for `~` canonicalization, and the explicit
/// invocation mode instead of process-global state.
#[derive(Debug, Clone)]
pub struct OffworldContext {
    /// Root of the version-controlled repository (the working directory).
    pub repo_root: PathBuf,

    /// Home directory substituted for the `~` token.
    pub home_dir: PathBuf,

    /// Whether the process was invoked under the delegate's own name.
    pub mode: InvocationMode,
}

impl OffworldContext {
    /// Creates a context rooted at the current working directory.
    ///
    /// # Errors
    /// Returns an error if the working directory or the home directory
    /// cannot be determined.
    pub fn new(mode: InvocationMode) -> Result<Self> {
        let repo_root =
            std::env::current_dir().context("Failed to determine the working directory")?;
        let home_dir = dirs::home_dir().context("Could not find home directory")?;
        Ok(Self {
            repo_root,
            home_dir,
            mode,
        })
    }

    /// Creates a context with explicit paths, for tests.
    #[must_use]
    pub const fn new_explicit(repo_root: PathBuf, home_dir: PathBuf, mode: InvocationMode) -> Self {
        Self {
            repo_root,
            home_dir,
            mode,
        }
    }

    /// Whether the repository root is a git work tree.
    #[must_use]
    pub fn is_work_tree(&self) -> bool {
        self.repo_root.join(".git").is_dir()
    }
}

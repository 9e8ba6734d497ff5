//! Persisted manifest of tracked files.
//!
//! The manifest is the source of truth for "what is tracked". It maps each
//! canonical name to the protection flag that was computed when the file
//! was first tracked. It lives at `<repo-root>/.offworld` as a pretty
//! printed JSON object so that diffs of the repository stay readable, and
//! it is rewritten wholesale whenever `track` completes. Every other
//! command treats it as read-only.

use crate::MANIFEST_FILE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Mapping of canonical names to their recorded protection flags.
///
/// Entries are kept sorted so the persisted form is stable and
/// human-diffable. The stored flag is authoritative: it is computed once at
/// track time and never recomputed from the live filesystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, bool>,
}

impl Manifest {
    /// Loads the manifest from the repository root.
    ///
    /// Returns an empty manifest if the file does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = repo_root.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest at {}", path.display()))
    }

    /// Atomically rewrites the manifest file at the repository root.
    ///
    /// The caller stages the manifest with the delegate immediately after a
    /// successful save; persisting and staging always happen together.
    ///
    /// # Errors
    /// Returns an error if the manifest cannot be serialized or written.
    pub fn save(&self, repo_root: &Path) -> Result<()> {
        let path = repo_root.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;

        let mut tmp = tempfile::NamedTempFile::new_in(repo_root)
            .context("Failed to create temporary manifest file")?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to write manifest to {}", path.display()))?;

        Ok(())
    }

    /// Records a tracked name with its protection flag.
    pub fn insert(&mut self, name: String, protected: bool) {
        self.entries.insert(name, protected);
    }

    /// Iterates over `(name, protected)` pairs in stable order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(name, p)| (name.as_str(), *p))
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tracked names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

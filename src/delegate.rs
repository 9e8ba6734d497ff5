//! Resolution and invocation of the wrapped version-control tool.
//!
//! Offworld can be installed under git's own name (a shell alias or a
//! symlink earlier on `PATH`), in which case every invocation implicitly
//! wraps the real tool. The resolver scans `PATH` in order for a git whose
//! canonical path is not the running program, so the wrapper never invokes
//! itself.

use anyhow::{Context, Result, bail};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Conventional name of the delegate executable.
pub const DELEGATE_TOOL: &str = "git";

/// How the process was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    /// Invoked under its own name; passthrough commands only refresh
    /// mirrors.
    Wrapper,
    /// Invoked under the delegate's name; every passthrough command wraps
    /// the real tool.
    Alias,
}

impl InvocationMode {
    /// Detects the mode from the program name the process was started
    /// with.
    #[must_use]
    pub fn detect(program: &OsStr) -> Self {
        match Path::new(program).file_name() {
            Some(name) if name == DELEGATE_TOOL => Self::Alias,
            _ => Self::Wrapper,
        }
    }
}

/// The resolved real delegate executable.
#[derive(Debug, Clone)]
pub struct Delegate {
    executable: PathBuf,
}

impl Delegate {
    /// Creates a delegate around a known executable path.
    #[must_use]
    pub const fn new(executable: PathBuf) -> Self {
        Self { executable }
    }

    /// Resolves the real delegate by scanning `PATH` in order.
    ///
    /// # Errors
    /// Returns an error if the running executable cannot be located or if
    /// no delegate distinct from the running program exists on `PATH`.
    pub fn resolve() -> Result<Self> {
        let current = std::env::current_exe().context("Failed to locate the running executable")?;
        Self::resolve_with(&current, || {
            which::which_all(DELEGATE_TOOL).map_or_else(|_| Vec::new(), |found| found.collect())
        })
    }

    /// Resolution with an injectable candidate search, for tests.
    ///
    /// # Errors
    /// Returns an error if every candidate resolves to the running
    /// program.
    pub fn resolve_with<F>(current_exe: &Path, search: F) -> Result<Self>
    where
        F: FnOnce() -> Vec<PathBuf>,
    {
        let current = current_exe
            .canonicalize()
            .unwrap_or_else(|_| current_exe.to_path_buf());

        for candidate in search() {
            let resolved = candidate
                .canonicalize()
                .unwrap_or_else(|_| candidate.clone());
            if resolved != current {
                debug!(executable = %candidate.display(), "resolved delegate");
                return Ok(Self::new(candidate));
            }
        }

        bail!("no {DELEGATE_TOOL} executable found on PATH other than the running program")
    }

    /// Path of the resolved executable.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Stages a repository-relative path with the delegate.
    ///
    /// # Errors
    /// Returns an error if the delegate cannot be spawned or exits
    /// unsuccessfully; its stderr is surfaced in the message.
    pub fn stage(&self, repo_root: &Path, path: &Path) -> Result<()> {
        let output = Command::new(&self.executable)
            .arg("add")
            .arg(path)
            .current_dir(repo_root)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {DELEGATE_TOOL} add"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{DELEGATE_TOOL} add failed for {}: {}",
                path.display(),
                stderr.trim()
            );
        }

        debug!(path = %path.display(), "staged");
        Ok(())
    }

    /// Runs the delegate with the given argument vector, inheriting the
    /// current process's standard streams, and returns its exit code.
    ///
    /// # Errors
    /// Returns an error if the delegate cannot be spawned.
    pub fn invoke(&self, args: &[OsString]) -> Result<i32> {
        debug!(executable = %self.executable.display(), ?args, "delegating");
        let status = Command::new(&self.executable)
            .args(args)
            .status()
            .with_context(|| format!("Failed to execute {}", self.executable.display()))?;

        // A signal death has no code; report it as a plain failure.
        Ok(status.code().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_mode_is_detected_from_the_program_name() {
        assert_eq!(
            InvocationMode::detect(OsStr::new("/usr/local/bin/git")),
            InvocationMode::Alias
        );
        assert_eq!(InvocationMode::detect(OsStr::new("git")), InvocationMode::Alias);
        assert_eq!(
            InvocationMode::detect(OsStr::new("/usr/bin/ow")),
            InvocationMode::Wrapper
        );
        assert_eq!(InvocationMode::detect(OsStr::new("")), InvocationMode::Wrapper);
    }

    #[test]
    fn resolution_skips_the_running_program() {
        let current = PathBuf::from("/opt/offworld/git");
        let real = PathBuf::from("/usr/bin/git");
        let candidates = vec![current.clone(), real.clone()];

        let delegate = Delegate::resolve_with(&current, || candidates).unwrap();
        assert_eq!(delegate.executable(), real.as_path());
    }

    #[test]
    fn resolution_takes_the_first_distinct_candidate() {
        let current = PathBuf::from("/opt/offworld/git");
        let candidates = vec![
            PathBuf::from("/usr/local/bin/git"),
            PathBuf::from("/usr/bin/git"),
        ];

        let delegate = Delegate::resolve_with(&current, || candidates).unwrap();
        assert_eq!(delegate.executable(), Path::new("/usr/local/bin/git"));
    }

    #[test]
    fn resolution_fails_when_only_the_wrapper_exists() {
        let current = PathBuf::from("/opt/offworld/git");
        let err = Delegate::resolve_with(&current, || vec![current.clone()]).unwrap_err();
        assert!(err.to_string().contains("no git executable"));
    }

    #[test]
    fn resolution_fails_on_an_empty_search_path() {
        let current = PathBuf::from("/opt/offworld/git");
        assert!(Delegate::resolve_with(&current, Vec::new).is_err());
    }
}

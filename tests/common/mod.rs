use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture: a git work tree and a fake home directory, both inside
/// one temporary directory.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub repo_root: PathBuf,
    pub home: PathBuf,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let repo_root = temp_dir.path().join("repo");
        let home = temp_dir.path().join("home");
        fs::create_dir_all(&repo_root)?;
        fs::create_dir_all(&home)?;

        let status = std::process::Command::new("git")
            .args(["init", "--quiet"])
            .current_dir(&repo_root)
            .status()?;
        assert!(status.success(), "git init failed");

        Ok(Self {
            temp_dir,
            repo_root,
            home,
        })
    }

    /// An `ow` command running inside the work tree with HOME redirected.
    pub fn ow(&self) -> Command {
        let mut cmd = Command::cargo_bin("ow").expect("ow binary");
        cmd.current_dir(&self.repo_root).env("HOME", &self.home);
        cmd
    }

    /// Writes a file under the fake home directory.
    pub fn write_home_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.home.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.repo_root.join(".offworld")
    }

    pub fn read_manifest(&self) -> Result<serde_json::Value> {
        let content = fs::read_to_string(self.manifest_path())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Mirror location of a file living under the fake home directory.
    pub fn home_mirror(&self, name: &str) -> PathBuf {
        self.repo_root.join("offworld/_home_").join(name)
    }

    /// Mirror location of an absolute path outside the home directory.
    pub fn abs_mirror(&self, path: &Path) -> PathBuf {
        let rel = path.strip_prefix("/").unwrap_or(path);
        self.repo_root.join("offworld").join(rel)
    }
}

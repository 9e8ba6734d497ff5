mod common;

use anyhow::Result;
use common::TestRepo;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

#[test]
fn track_mirrors_home_file_under_home_namespace() -> Result<()> {
    let repo = TestRepo::new()?;
    let bashrc = repo.write_home_file(".bashrc", "export PS1='$ '\n")?;

    repo.ow()
        .args(["track", bashrc.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("tracked:"));

    let mirror = repo.home_mirror(".bashrc");
    assert_eq!(fs::read_to_string(&mirror)?, "export PS1='$ '\n");

    let manifest = repo.read_manifest()?;
    assert_eq!(manifest["~/.bashrc"], serde_json::Value::Bool(false));
    Ok(())
}

#[test]
fn track_accepts_literal_tilde_arguments() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.write_home_file(".vimrc", "set nocompatible\n")?;

    repo.ow().args(["track", "~/.vimrc"]).assert().success();

    assert!(repo.home_mirror(".vimrc").is_file());
    let manifest = repo.read_manifest()?;
    assert_eq!(manifest["~/.vimrc"], serde_json::Value::Bool(false));
    Ok(())
}

#[test]
fn track_records_absolute_paths_outside_home() -> Result<()> {
    let repo = TestRepo::new()?;
    let outside = repo.temp_dir.path().join("etc/demo.conf");
    fs::create_dir_all(outside.parent().unwrap())?;
    fs::write(&outside, "key=value\n")?;

    repo.ow()
        .args(["track", outside.to_str().unwrap()])
        .assert()
        .success();

    let mirror = repo.abs_mirror(&outside);
    assert_eq!(fs::read_to_string(&mirror)?, "key=value\n");

    let manifest = repo.read_manifest()?;
    assert_eq!(
        manifest[outside.to_str().unwrap()],
        serde_json::Value::Bool(false)
    );
    Ok(())
}

#[test]
fn track_stages_mirror_and_manifest() -> Result<()> {
    let repo = TestRepo::new()?;
    let bashrc = repo.write_home_file(".bashrc", "alias ll='ls -l'\n")?;

    repo.ow()
        .args(["track", bashrc.to_str().unwrap()])
        .assert()
        .success();

    let output = std::process::Command::new("git")
        .args(["ls-files", "--cached"])
        .current_dir(&repo.repo_root)
        .output()?;
    let staged = String::from_utf8_lossy(&output.stdout).to_string();
    assert!(staged.contains("offworld/_home_/.bashrc"), "staged: {staged}");
    assert!(staged.contains(".offworld"), "staged: {staged}");
    Ok(())
}

#[test]
fn track_marks_read_only_files_protected() -> Result<()> {
    let repo = TestRepo::new()?;
    let secret = repo.write_home_file(".netrc", "machine example.com\n")?;
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o444))?;

    repo.ow()
        .args(["track", secret.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("not writable"));

    let manifest = repo.read_manifest()?;
    assert_eq!(manifest["~/.netrc"], serde_json::Value::Bool(true));
    Ok(())
}

#[test]
fn track_nonexistent_path_mutates_nothing() -> Result<()> {
    let repo = TestRepo::new()?;
    let bashrc = repo.write_home_file(".bashrc", "export EDITOR=vim\n")?;
    repo.ow()
        .args(["track", bashrc.to_str().unwrap()])
        .assert()
        .success();
    let manifest_before = fs::read(repo.manifest_path())?;

    let other = repo.write_home_file(".profile", "umask 022\n")?;
    repo.ow()
        .args([
            "track",
            other.to_str().unwrap(),
            repo.home.join("missing.conf").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("non-existent"));

    // Validation failed, so nothing was mirrored and the manifest is
    // byte-identical to its prior state.
    assert!(!repo.home_mirror(".profile").exists());
    assert_eq!(fs::read(repo.manifest_path())?, manifest_before);
    Ok(())
}

#[test]
fn track_rejects_directories() -> Result<()> {
    let repo = TestRepo::new()?;
    fs::create_dir_all(repo.home.join(".config"))?;

    repo.ow()
        .args(["track", repo.home.join(".config").to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("non-existent"));
    Ok(())
}

#[test]
fn track_outside_work_tree_fails_with_usage() -> Result<()> {
    let temp_dir = TempDir::new()?;

    assert_cmd::Command::cargo_bin("ow")?
        .current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .args(["track", "whatever"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not inside a git work tree"))
        .stdout(predicate::str::contains("track <paths...>"));
    Ok(())
}

#[test]
fn track_without_paths_prints_usage() -> Result<()> {
    let repo = TestRepo::new()?;

    repo.ow()
        .arg("track")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("COMMANDS"));
    Ok(())
}

#[test]
fn repeated_track_updates_the_mirror() -> Result<()> {
    let repo = TestRepo::new()?;
    let bashrc = repo.write_home_file(".bashrc", "v1\n")?;
    repo.ow()
        .args(["track", bashrc.to_str().unwrap()])
        .assert()
        .success();

    fs::write(&bashrc, "v2\n")?;
    repo.ow()
        .args(["track", bashrc.to_str().unwrap()])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(repo.home_mirror(".bashrc"))?, "v2\n");
    assert_eq!(repo.read_manifest()?.as_object().unwrap().len(), 1);
    Ok(())
}

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tempfile::TempDir;

pub const NOTICE: &str = "Copyright (c) 2024 Example Corp\nSPDX-License-Identifier: Apache-2.0\n";

/// Checks if git is available on the system.
pub fn is_git_available() -> bool {
  Command::new("git").arg("--version").status().is_ok()
}

/// Runs a git command in the given directory, returning an error with stderr on
/// failure.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<()> {
  let output = Command::new("git")
    .args(args)
    .current_dir(dir)
    .output()
    .with_context(|| format!("Failed to execute git {:?}", args))?;

  if !output.status.success() {
    anyhow::bail!("git {:?} failed: {}", args, String::from_utf8_lossy(&output.stderr));
  }
  Ok(())
}

/// Initializes a git repository in the given directory with deterministic
/// settings.
pub fn init_git_repo(dir: &Path) -> Result<()> {
  run_git(dir, &["init", "--quiet"])?;
  run_git(dir, &["config", "user.name", "Test User"])?;
  run_git(dir, &["config", "user.email", "test@example.com"])?;
  run_git(dir, &["config", "commit.gpgsign", "false"])?;
  Ok(())
}

/// Writes `content` to `rel` below `root`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) -> Result<()> {
  let path = root.join(rel);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Writes and stages a file.
pub fn add_file(root: &Path, rel: &str, content: &str) -> Result<()> {
  write_file(root, rel, content)?;
  run_git(root, &["add", rel])
}

pub fn read_file(root: &Path, rel: &str) -> String {
  fs::read_to_string(root.join(rel)).expect("read file")
}

/// A fresh repository with the default notice in `COPY`.
///
/// Returns `None` when git is not installed.
pub fn repo_with_notice() -> Option<TempDir> {
  if !is_git_available() {
    eprintln!("Skipping test: git not available");
    return None;
  }

  let temp_dir = TempDir::new().expect("create temp dir");
  init_git_repo(temp_dir.path()).expect("init repo");
  write_file(temp_dir.path(), "COPY", NOTICE).expect("write notice");
  Some(temp_dir)
}

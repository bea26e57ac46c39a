//! # Workspace Module
//!
//! The git repository notice-headers operates on. All paths handed to the
//! rest of the crate are relative to its root.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::git;

/// A git working tree.
#[derive(Debug, Clone)]
pub struct Workspace {
  root: PathBuf,
}

impl Workspace {
  pub const fn new(root: PathBuf) -> Self {
    Self { root }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Turn a user-supplied directory into a path relative to the root.
  ///
  /// Relative directories are taken as relative to the root already.
  /// Absolute directories must lie inside the repository.
  pub fn relative_dir(&self, dir: &Path) -> Result<PathBuf> {
    let relative = if dir.is_absolute() {
      let root = canonical(&self.root);
      let dir = canonical(dir);
      match pathdiff::diff_paths(&dir, &root) {
        Some(rel) if !rel.components().any(|c| c == Component::ParentDir) => rel,
        _ => bail!(
          "Directory {} is outside the repository at {}",
          dir.display(),
          root.display()
        ),
      }
    } else {
      if dir.components().any(|c| c == Component::ParentDir) {
        bail!("Directory {} must not leave the repository root", dir.display());
      }
      dir.to_path_buf()
    };

    if relative.as_os_str().is_empty() {
      return Ok(PathBuf::from("."));
    }
    Ok(relative)
  }
}

fn canonical(path: &Path) -> PathBuf {
  path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve the workspace containing the current directory.
pub fn resolve_workspace() -> Result<Workspace> {
  let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
  resolve_workspace_from(&current_dir)
}

/// Resolve the workspace containing `start`.
pub fn resolve_workspace_from(start: &Path) -> Result<Workspace> {
  match git::discover_repo_root(start)? {
    Some(root) => Ok(Workspace::new(root)),
    None => bail!("{} is not inside a git working tree", start.display()),
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_relative_dir_passthrough() {
    let workspace = Workspace::new(PathBuf::from("/repo"));

    assert_eq!(workspace.relative_dir(Path::new("pkgs")).expect("relative"), PathBuf::from("pkgs"));
    assert_eq!(workspace.relative_dir(Path::new(".")).expect("relative"), PathBuf::from("."));
    assert!(workspace.relative_dir(Path::new("../elsewhere")).is_err());
  }

  #[test]
  fn test_relative_dir_from_absolute() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::create_dir_all(temp_dir.path().join("src/app")).expect("create dirs");
    let workspace = Workspace::new(temp_dir.path().to_path_buf());

    assert_eq!(
      workspace.relative_dir(&temp_dir.path().join("src/app")).expect("relative"),
      PathBuf::from("src/app")
    );
    assert_eq!(
      workspace.relative_dir(temp_dir.path()).expect("relative"),
      PathBuf::from(".")
    );
  }

  #[test]
  fn test_relative_dir_outside_repository() {
    let repo = TempDir::new().expect("create temp dir");
    let other = TempDir::new().expect("create temp dir");
    let workspace = Workspace::new(repo.path().to_path_buf());

    assert!(workspace.relative_dir(other.path()).is_err());
  }
}

//! # Git Module
//!
//! Repository discovery and the list of version-controlled files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::{ErrorCode, Repository};
use tracing::debug;

use crate::verbose_log;

/// File mode of a submodule (gitlink) entry in the index.
const GITLINK_MODE: u32 = 0o160000;

/// Returns the working-tree root of the repository containing `start`.
///
/// Returns `Ok(None)` when `start` is not inside a repository, or the
/// repository is bare.
pub fn discover_repo_root(start: &Path) -> Result<Option<PathBuf>> {
  match Repository::discover(start) {
    Ok(repo) => Ok(repo.workdir().map(Path::to_path_buf)),
    Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
    Err(e) => Err(e).with_context(|| format!("Failed to open git repository at {}", start.display())),
  }
}

/// Lists files tracked in the index of the repository at `repo_root` that
/// live under `dir`.
///
/// `dir` is relative to the repository root; `.` selects everything. Paths
/// are returned relative to the root, sorted, with submodule entries removed.
pub fn tracked_files(repo_root: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
  let repo = Repository::open(repo_root)
    .with_context(|| format!("Failed to open git repository at {}", repo_root.display()))?;
  let index = repo.index().with_context(|| "Failed to read git index")?;

  let prefix = normalize_dir(dir);
  debug!("Listing tracked files under '{}'", prefix.display());

  let mut files = Vec::new();
  for entry in index.iter() {
    if entry.mode == GITLINK_MODE {
      continue;
    }

    let Ok(path) = std::str::from_utf8(&entry.path) else {
      verbose_log!("Skipping non UTF-8 path in index: {}", String::from_utf8_lossy(&entry.path));
      continue;
    };

    let path = PathBuf::from(path);
    if prefix.as_os_str().is_empty() || path.starts_with(&prefix) {
      files.push(path);
    }
  }

  // Conflicted entries appear once per stage.
  files.sort();
  files.dedup();

  verbose_log!("Found {} tracked files under '{}'", files.len(), dir.display());

  Ok(files)
}

/// Strips `.` components so `./src/` and `src` select the same entries.
fn normalize_dir(dir: &Path) -> PathBuf {
  dir
    .components()
    .filter(|c| !matches!(c, std::path::Component::CurDir))
    .collect()
}

//! # Diff Module
//!
//! Line diffs of the change update mode would make, shown in check mode with
//! `--show-diff` or appended to a file with `--save-diff`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use similar::{ChangeTag, TextDiff};

/// Renders and records diffs for non-compliant files.
#[derive(Debug, Default)]
pub struct DiffManager {
  /// Whether to print diffs to stderr
  pub show_diff: bool,

  /// File that diffs are appended to
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Whether any diff output was requested.
  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncate the diff file so one run produces one consolidated diff.
  pub fn init(&self) -> Result<()> {
    if let Some(ref path) = self.save_diff_path {
      std::fs::write(path, "").with_context(|| format!("Failed to create diff file {}", path.display()))?;
    }
    Ok(())
  }

  /// Display and/or save the diff between `original` and `new`.
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) -> Result<()> {
    if !self.is_enabled() {
      return Ok(());
    }

    let diff_content = render_diff(path, original, new);

    if self.show_diff {
      eprint!("{}", diff_content);
    }

    if let Some(ref diff_path) = self.save_diff_path {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file {}", diff_path.display()))?;
      file
        .write_all(diff_content.as_bytes())
        .with_context(|| format!("Failed to write diff file {}", diff_path.display()))?;
    }

    Ok(())
  }
}

/// One file's diff: a header line, then every line prefixed with `-`, `+` or a
/// space.
pub fn render_diff(path: &Path, original: &str, new: &str) -> String {
  let diff = TextDiff::from_lines(original, new);

  let mut diff_content = format!("Diff for {}:\n", path.display());
  for change in diff.iter_all_changes() {
    let sign = match change.tag() {
      ChangeTag::Delete => "-",
      ChangeTag::Insert => "+",
      ChangeTag::Equal => " ",
    };
    diff_content.push_str(sign);
    diff_content.push_str(change.value());
    if change.missing_newline() {
      diff_content.push('\n');
    }
  }
  diff_content.push('\n');

  diff_content
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_render_diff_marks_inserted_lines() {
    let diff = render_diff(Path::new("a.rs"), "fn main() {}\n", "// Copyright (c) 2024 X\n\nfn main() {}\n");

    assert_eq!(
      diff,
      "Diff for a.rs:\n+// Copyright (c) 2024 X\n+\n fn main() {}\n\n"
    );
  }

  #[test]
  fn test_save_diff_appends_per_file() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let diff_path = temp_dir.path().join("changes.diff");
    std::fs::write(&diff_path, "stale").expect("write");

    let manager = DiffManager::new(false, Some(diff_path.clone()));
    manager.init().expect("init");
    manager.display_diff(Path::new("a.rs"), "a\n", "b\n").expect("diff");
    manager.display_diff(Path::new("b.rs"), "c\n", "d\n").expect("diff");

    let saved = std::fs::read_to_string(&diff_path).expect("read diff");
    assert!(!saved.contains("stale"));
    assert!(saved.contains("Diff for a.rs:\n-a\n+b\n"));
    assert!(saved.contains("Diff for b.rs:\n-c\n+d\n"));
  }

  #[test]
  fn test_disabled_manager_writes_nothing() {
    let manager = DiffManager::default();
    assert!(!manager.is_enabled());
    manager.display_diff(Path::new("a.rs"), "a\n", "b\n").expect("diff");
  }
}

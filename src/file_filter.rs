//! # File Filter Module
//!
//! Filters applied to the tracked files before their headers are inspected.
//! Every filter receives paths relative to the repository root.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::opt_out::OptOutIndex;
use crate::verbose_log;

/// Result of a file filtering operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
  /// Whether the file should be processed
  pub should_process: bool,
  /// Reason why the file should not be processed (if any)
  pub reason: Option<String>,
}

impl FilterResult {
  /// The file should be processed.
  pub const fn process() -> Self {
    Self {
      should_process: true,
      reason: None,
    }
  }

  /// The file should be skipped for `reason`.
  pub fn skip(reason: impl Into<String>) -> Self {
    Self {
      should_process: false,
      reason: Some(reason.into()),
    }
  }
}

/// Trait for components that filter files based on certain criteria.
pub trait FileFilter: Send + Sync {
  /// Determines whether a file should be processed.
  fn should_process(&self, path: &Path) -> Result<FilterResult>;
}

/// Skips symlinks and index entries that are missing from the working tree.
pub struct WorkingTreeFilter {
  root: PathBuf,
}

impl WorkingTreeFilter {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }
}

impl FileFilter for WorkingTreeFilter {
  fn should_process(&self, path: &Path) -> Result<FilterResult> {
    // symlink_metadata does not follow links
    match std::fs::symlink_metadata(self.root.join(path)) {
      Ok(meta) if meta.file_type().is_symlink() => {
        verbose_log!("Skipping: {} (symlink)", path.display());
        Ok(FilterResult::skip("Symlink"))
      }
      Ok(meta) if !meta.is_file() => {
        verbose_log!("Skipping: {} (not a regular file)", path.display());
        Ok(FilterResult::skip("Not a regular file"))
      }
      Ok(_) => Ok(FilterResult::process()),
      Err(_) => {
        verbose_log!("Skipping: {} (missing from working tree)", path.display());
        Ok(FilterResult::skip("Missing from working tree"))
      }
    }
  }
}

/// Skips files below a directory containing the opt-out marker.
pub struct OptOutFilter {
  index: OptOutIndex,
}

impl OptOutFilter {
  pub const fn new(index: OptOutIndex) -> Self {
    Self { index }
  }
}

impl FileFilter for OptOutFilter {
  fn should_process(&self, path: &Path) -> Result<FilterResult> {
    match self.index.opted_out_by(path) {
      Some(dir) => {
        verbose_log!(
          "Skipping: {} ({} in '{}')",
          path.display(),
          self.index.marker(),
          dir.display()
        );
        Ok(FilterResult::skip(format!(
          "Opted out by {}",
          dir.join(self.index.marker()).display()
        )))
      }
      None => Ok(FilterResult::process()),
    }
  }
}

/// Filter that combines multiple filters.
pub struct CompositeFilter {
  filters: Vec<Box<dyn FileFilter>>,
}

impl CompositeFilter {
  pub fn new(filters: Vec<Box<dyn FileFilter>>) -> Self {
    Self { filters }
  }

  pub fn add_filter(&mut self, filter: Box<dyn FileFilter>) {
    self.filters.push(filter);
  }
}

impl FileFilter for CompositeFilter {
  fn should_process(&self, path: &Path) -> Result<FilterResult> {
    for filter in &self.filters {
      let result = filter.should_process(path)?;
      if !result.should_process {
        return Ok(result);
      }
    }
    Ok(FilterResult::process())
  }
}

/// The filter chain used for a run: working-tree checks, then opt-out markers.
pub fn create_default_filter(root: &Path, marker: &str) -> CompositeFilter {
  CompositeFilter::new(vec![
    Box::new(WorkingTreeFilter::new(root)),
    Box::new(OptOutFilter::new(OptOutIndex::new(root, marker))),
  ])
}

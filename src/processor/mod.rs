//! # Processor Module
//!
//! Per-file orchestration: filter, resolve the comment format, parse the
//! existing header, then report (check mode) or rewrite (update mode).
//!
//! The [`Processor`] is the main entry point; it collects a [`FileReport`]
//! for every file it is given.

mod file_io;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
pub use file_io::FileIO;
use tracing::{debug, trace};

use crate::diff::DiffManager;
use crate::file_filter::{CompositeFilter, FileFilter, create_default_filter};
use crate::formats::{BuiltinResolver, FormatResolver};
use crate::header::{compose, parse};
use crate::notice::{NoticeText, render};
use crate::output::{print_file_status, print_mismatch};
use crate::report::{FileReport, FileStatus};
use crate::{config, git};

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub notice: NoticeText,
  pub workspace_root: PathBuf,

  /// Only report; never write
  pub check_only: bool,

  pub resolver: Box<dyn FormatResolver>,
  pub opt_out_marker: String,
  pub diff_manager: Option<DiffManager>,
}

impl ProcessorConfig {
  /// Creates a ProcessorConfig with the built-in formats, the default opt-out
  /// marker, and update mode.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     check_only: true,
  ///     ..ProcessorConfig::new(notice, workspace_root)
  /// }
  /// ```
  pub fn new(notice: NoticeText, workspace_root: PathBuf) -> Self {
    Self {
      notice,
      workspace_root,
      check_only: false,
      resolver: Box::new(BuiltinResolver),
      opt_out_marker: config::DEFAULT_OPT_OUT_MARKER.to_string(),
      diff_manager: None,
    }
  }
}

/// Checks or updates notice headers of files in one repository.
pub struct Processor {
  /// Root of the repository; every path handled is relative to it
  workspace_root: PathBuf,

  notice: NoticeText,
  resolver: Box<dyn FormatResolver>,
  filter: CompositeFilter,
  check_only: bool,
  diff_manager: DiffManager,

  /// Reports for every file processed so far
  file_reports: Vec<FileReport>,
}

impl Processor {
  pub fn new(config: ProcessorConfig) -> Self {
    let filter = create_default_filter(&config.workspace_root, &config.opt_out_marker);

    Self {
      workspace_root: config.workspace_root,
      notice: config.notice,
      resolver: config.resolver,
      filter,
      check_only: config.check_only,
      diff_manager: config.diff_manager.unwrap_or_default(),
      file_reports: Vec::new(),
    }
  }

  /// Tracked files under `dir` (relative to the repository root).
  pub fn collect_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
    git::tracked_files(&self.workspace_root, dir)
  }

  /// Process `files` in order.
  ///
  /// Returns `true` when running in check mode and at least one file is
  /// non-compliant. Read, write and parser errors abort processing.
  pub fn process_files(&mut self, files: &[PathBuf]) -> Result<bool> {
    let mut failed = false;

    for path in files {
      let report = self.process_file(path)?;
      if self.check_only && report.is_non_compliant() {
        failed = true;
      }
      self.file_reports.push(report);
    }

    debug!("Processed {} files", files.len());
    Ok(failed)
  }

  /// Check or update a single file and report what happened.
  pub fn process_file(&self, path: &Path) -> Result<FileReport> {
    let filter_result = self.filter.should_process(path)?;
    if !filter_result.should_process {
      let reason = filter_result.reason.unwrap_or_else(|| "Filtered".to_string());
      return Ok(FileReport::skipped(path, reason));
    }

    let Some(format) = self.resolver.resolve(path) else {
      trace!("Skipping: {} (unrecognized file type)", path.display());
      return Ok(FileReport::skipped(path, "Unrecognized file type"));
    };

    let full_path = self.workspace_root.join(path);
    let content = FileIO::read_text(&full_path)?;

    let rendered = render(&self.notice, &format);
    let result =
      parse(&content, &rendered, &format).with_context(|| format!("Failed to parse header of {}", path.display()))?;

    if let Some(ref mismatch) = result.mismatch {
      print_mismatch(path, mismatch);
    }

    let status = FileStatus::from_header(result.state, self.check_only);

    if let Some(updated) = compose(&result, &rendered, &format) {
      if self.check_only {
        self.diff_manager.display_diff(path, &content, &updated)?;
      } else {
        FileIO::write_file(&full_path, &updated)?;
      }
    }

    print_file_status(path, status);
    Ok(FileReport::new(path, status))
  }

  /// Reports collected so far.
  pub fn file_reports(&self) -> &[FileReport] {
    &self.file_reports
  }

  /// Take ownership of the collected reports.
  pub fn take_reports(&mut self) -> Vec<FileReport> {
    std::mem::take(&mut self.file_reports)
  }
}

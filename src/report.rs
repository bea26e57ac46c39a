//! # Report Module
//!
//! Per-file results of a run and the JSON report written with
//! `--report-json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::header::HeaderState;

/// Information about a processed file for reporting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileReport {
  /// Path to the file, relative to the repository root
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// Outcome for the file
  pub status: FileStatus,
  /// Reason the file was skipped, if applicable
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ignored_reason: Option<String>,
}

impl FileReport {
  pub fn new(path: impl Into<PathBuf>, status: FileStatus) -> Self {
    Self {
      path: path.into(),
      status,
      ignored_reason: None,
    }
  }

  pub fn skipped(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      status: FileStatus::Skipped,
      ignored_reason: Some(reason.into()),
    }
  }

  /// Whether the file needs (or needed) a header change.
  pub const fn is_non_compliant(&self) -> bool {
    matches!(
      self.status,
      FileStatus::Missing | FileStatus::OutOfDate | FileStatus::Inserted | FileStatus::Replaced
    )
  }
}

/// Outcome for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
  /// The header is already correct
  Compliant,
  /// Check mode: no header found
  Missing,
  /// Check mode: a stale header was found
  OutOfDate,
  /// Update mode: a header was inserted
  Inserted,
  /// Update mode: a stale header was replaced
  Replaced,
  /// The file was not inspected
  Skipped,
}

impl FileStatus {
  /// Status for a parsed header in the given mode.
  pub const fn from_header(state: HeaderState, check_only: bool) -> Self {
    match (state, check_only) {
      (HeaderState::Ok, _) => FileStatus::Compliant,
      (HeaderState::Missing, true) => FileStatus::Missing,
      (HeaderState::Fail, true) => FileStatus::OutOfDate,
      (HeaderState::Missing, false) => FileStatus::Inserted,
      (HeaderState::Fail, false) => FileStatus::Replaced,
    }
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Summary of the processing results
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  /// Total number of files considered
  pub total_files: usize,
  pub compliant: usize,
  pub missing: usize,
  pub out_of_date: usize,
  pub inserted: usize,
  pub replaced: usize,
  pub skipped: usize,
  /// Total processing time
  #[serde(skip_serializing)]
  pub processing_time: std::time::Duration,
  /// Processing time in seconds for serialization
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  /// Timestamp when the summary was created
  pub timestamp: i64,
}

impl ProcessingSummary {
  /// Create a ProcessingSummary from a collection of FileReports
  pub fn from_reports(files: &[FileReport], processing_time: std::time::Duration) -> Self {
    let mut summary = Self {
      total_files: files.len(),
      compliant: 0,
      missing: 0,
      out_of_date: 0,
      inserted: 0,
      replaced: 0,
      skipped: 0,
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Local::now().timestamp(),
    };

    for file in files {
      let counter = match file.status {
        FileStatus::Compliant => &mut summary.compliant,
        FileStatus::Missing => &mut summary.missing,
        FileStatus::OutOfDate => &mut summary.out_of_date,
        FileStatus::Inserted => &mut summary.inserted,
        FileStatus::Replaced => &mut summary.replaced,
        FileStatus::Skipped => &mut summary.skipped,
      };
      *counter += 1;
    }

    summary
  }

  /// Files that failed the check (check mode) or were rewritten (update mode).
  pub const fn non_compliant(&self) -> usize {
    self.missing + self.out_of_date + self.inserted + self.replaced
  }
}

#[derive(Serialize)]
struct JsonReport<'a> {
  summary: &'a ProcessingSummary,
  files: &'a [FileReport],
}

/// Render the JSON report.
pub fn render_json(files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
  serde_json::to_string_pretty(&JsonReport { summary, files }).with_context(|| "Failed to serialize report")
}

/// Write the JSON report to `output_path`.
pub fn write_json_report(output_path: &Path, files: &[FileReport], summary: &ProcessingSummary) -> Result<()> {
  let content = render_json(files, summary)?;
  fs::write(output_path, content).with_context(|| format!("Failed to write report to {}", output_path.display()))
}

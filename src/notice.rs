//! # Notice Module
//!
//! Loads the canonical notice text and renders it into the exact header block
//! expected for a given comment format.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::formats::FormatDescriptor;
use crate::verbose_log;

/// Text that the first notice line must start with for an existing header to
/// be recognized.
pub const NOTICE_OPENER: &str = "Copyright (c)";

/// Errors raised while loading the notice text.
#[derive(Debug, thiserror::Error)]
pub enum NoticeError {
  /// The notice file could not be read.
  #[error("Failed to read notice file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The notice file has no non-blank lines.
  #[error("Notice file '{0}' is empty")]
  Empty(PathBuf),
}

/// The canonical notice, one entry per line without comment markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeText {
  lines: Vec<String>,
}

impl NoticeText {
  /// Build a notice from literal lines.
  ///
  /// Each line is right-trimmed and trailing blank lines are dropped. Returns
  /// `None` when nothing remains.
  pub fn new<I, S>(lines: I) -> Option<Self>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut lines: Vec<String> = lines.into_iter().map(|l| l.as_ref().trim_end().to_string()).collect();

    while lines.last().is_some_and(|l| l.is_empty()) {
      lines.pop();
    }

    if lines.is_empty() {
      return None;
    }

    if !lines[0].starts_with(NOTICE_OPENER) {
      warn!(
        "First notice line does not start with '{}'; existing headers will not be recognized",
        NOTICE_OPENER
      );
    }

    Some(Self { lines })
  }

  /// Read the notice from a file.
  pub fn load(path: &Path) -> Result<Self, NoticeError> {
    verbose_log!("Loading notice from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| NoticeError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    Self::new(content.lines()).ok_or_else(|| NoticeError::Empty(path.to_path_buf()))
  }

  /// The notice lines.
  pub fn lines(&self) -> &[String] {
    &self.lines
  }
}

/// The header expected in files of one format.
///
/// `start` is the optional marker line preceding the commented notice;
/// `body` holds one commented line per notice line, followed by the end marker
/// line for prefixed formats that have one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHeader {
  start: Option<String>,
  body: Vec<String>,
}

impl RenderedHeader {
  /// The start marker line, if the format has one.
  pub fn start(&self) -> Option<&str> {
    self.start.as_deref()
  }

  /// The commented notice lines.
  pub fn body(&self) -> &[String] {
    &self.body
  }

  /// All header lines in file order.
  pub fn lines(&self) -> impl Iterator<Item = &str> {
    self.start.iter().chain(self.body.iter()).map(String::as_str)
  }

  /// The text written to disk: every header line, then a blank separator.
  pub fn block(&self) -> String {
    let mut block = String::new();
    for line in self.lines() {
      block.push_str(line);
      block.push('\n');
    }
    block.push('\n');
    block
  }
}

/// Render `notice` for `format`.
pub fn render(notice: &NoticeText, format: &FormatDescriptor) -> RenderedHeader {
  let comment = |text: &str| -> String {
    if text.is_empty() {
      format.empty_line_marker().to_string()
    } else if format.is_wrapped() {
      if format.end.is_empty() {
        format!("{} {}", format.start, text)
      } else {
        format!("{} {} {}", format.start, text, format.end)
      }
    } else {
      format!("{} {}", format.line, text)
    }
  };

  let mut body: Vec<String> = notice.lines().iter().map(|l| comment(l)).collect();

  let prefixed = !format.is_wrapped();
  if prefixed && !format.end.is_empty() {
    body.push(format.end.clone());
  }

  let start = (prefixed && !format.start.is_empty()).then(|| format.start.clone());

  RenderedHeader { start, body }
}

//! # File I/O Module
//!
//! Whole-file reads and writes for the processor. Failures carry the file path
//! and abort the run.

use std::path::Path;

use anyhow::{Context, Result};

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Read a file as UTF-8 text.
  pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    String::from_utf8(bytes).with_context(|| format!("File is not valid UTF-8: {}", path.display()))
  }

  /// Replace a file's content.
  pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_read_and_write() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("a.rs");

    FileIO::write_file(&path, "fn main() {}\r\n").expect("write");
    assert_eq!(FileIO::read_text(&path).expect("read"), "fn main() {}\r\n");
  }

  #[test]
  fn test_read_rejects_invalid_utf8() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("bin.rs");
    std::fs::write(&path, [0x66, 0x6f, 0xff, 0x0a]).expect("write");

    let err = FileIO::read_text(&path).expect_err("invalid utf-8");
    assert!(format!("{err:#}").contains("not valid UTF-8"));
  }

  #[test]
  fn test_read_missing_file() {
    let err = FileIO::read_text(Path::new("/nonexistent/file.rs")).expect_err("missing file");
    assert!(err.to_string().contains("Failed to read file"));
  }
}

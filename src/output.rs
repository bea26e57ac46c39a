//! # Output Module
//!
//! All operator-facing output of a run. Per-file results go to stdout as they
//! are produced so the output can be piped; `-q` reduces it to the paths of
//! failing files.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::header::Mismatch;
use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileStatus, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Compliant or header written
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Header missing
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Header out-of-date
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Print "Checking N files..." or "Updating N files...".
pub fn print_start_message(file_count: usize, update_mode: bool) {
  if is_quiet() {
    return;
  }

  let verb = if update_mode { "Updating" } else { "Checking" };
  let files_word = if file_count == 1 { "file" } else { "files" };

  println!("{} {} {}...", verb, file_count, files_word);
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the first differing notice line of a file.
pub fn print_mismatch(path: &Path, mismatch: &Mismatch) {
  if is_quiet() {
    return;
  }

  println!(
    "{}: notice text mismatch:\n  actual  : {}\n  expected: {}",
    path.display(),
    mismatch.actual.if_supports_color(Stream::Stdout, |s| s.red()),
    mismatch.expected.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the result line for one file.
///
/// Compliant files are listed only with `-v`; skipped files never are.
pub fn print_file_status(path: &Path, status: FileStatus) {
  if is_quiet() {
    if matches!(status, FileStatus::Missing | FileStatus::OutOfDate) {
      println!("{}", path.display());
    }
    return;
  }

  let line = match status {
    FileStatus::Missing => format!(
      "{} {}: copyright header missing",
      symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
      path.display()
    ),
    FileStatus::OutOfDate => format!(
      "{} {}: copyright header out-of-date",
      symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()),
      path.display()
    ),
    FileStatus::Inserted | FileStatus::Replaced => format!(
      "{} {}: copyright header missing or out-of-date, updating.",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
      path.display()
    ),
    FileStatus::Compliant if is_verbose() => format!(
      "{} {}",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
      path.display()
    ),
    FileStatus::Compliant | FileStatus::Skipped => return,
  };

  println!("{}", line);
}

/// Print the success message when nothing needed a change.
pub fn print_all_files_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All files have up-to-date copyright headers.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the processing summary.
///
/// Format: "Summary: X OK, Y missing, Z out-of-date, W skipped" in check mode
/// and "Summary: X OK, Y inserted, Z replaced, W skipped" in update mode.
/// With `-v`, also shows timing.
pub fn print_summary(summary: &ProcessingSummary, check_only: bool) {
  if is_quiet() {
    return;
  }

  let count = |n: usize| {
    if n > 0 {
      n.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
    } else {
      n.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
    }
  };

  let ok_str = summary.compliant.if_supports_color(Stream::Stdout, |s| s.cyan());
  let skipped_str = summary.skipped.if_supports_color(Stream::Stdout, |s| s.dimmed());

  let mut summary_line = if check_only {
    format!(
      "Summary: {} OK, {} missing, {} out-of-date, {} skipped",
      ok_str,
      count(summary.missing),
      count(summary.out_of_date),
      skipped_str
    )
  } else {
    format!(
      "Summary: {} OK, {} inserted, {} replaced, {} skipped",
      ok_str, summary.inserted, summary.replaced, skipped_str
    )
  };

  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{}", summary_line);
}

/// Print the closing hint of a failed check.
pub fn print_check_failed_hint() {
  if is_quiet() {
    return;
  }

  println!(
    "{}",
    "Copyright header check failed.\nPlease update copyright headers by running 'notice-headers update'"
      .if_supports_color(Stream::Stdout, |s| s.yellow())
  );
}

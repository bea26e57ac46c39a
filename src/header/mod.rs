//! # Header Module
//!
//! Detects an existing notice header in a file, classifies it against the
//! rendered header, and composes the corrected content.
//!
//! - [`parse`] runs the [`HeaderMachine`] over a file and returns a
//!   [`ParseResult`] splitting the file into the lines before, inside and after
//!   the header region.
//! - [`compose`] builds the rewritten file for a non-compliant result.
//!
//! ## Example
//!
//! ```rust
//! use notice_headers::formats::lookup;
//! use notice_headers::header::{HeaderState, compose, parse};
//! use notice_headers::notice::{NoticeText, render};
//!
//! let format = lookup("rs").unwrap();
//! let notice = NoticeText::new(["Copyright (c) 2024 Example"]).unwrap();
//! let rendered = render(&notice, &format);
//!
//! let result = parse("fn main() {}\n", &rendered, &format).unwrap();
//! assert_eq!(result.state, HeaderState::Missing);
//!
//! let updated = compose(&result, &rendered, &format).unwrap();
//! assert_eq!(updated, "// Copyright (c) 2024 Example\n\nfn main() {}\n");
//! ```

mod machine;
mod writer;

use std::fmt;

pub use machine::{Effect, HeaderMachine, State, Transition, content, is_notice_opener};
pub use writer::compose;

use crate::formats::FormatDescriptor;
use crate::notice::RenderedHeader;

/// Classification of a file's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
  /// The header matches the rendered notice.
  Ok,
  /// A header exists but differs from the rendered notice.
  Fail,
  /// No header was found.
  Missing,
}

impl fmt::Display for HeaderState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HeaderState::Ok => write!(f, "ok"),
      HeaderState::Fail => write!(f, "out-of-date"),
      HeaderState::Missing => write!(f, "missing"),
    }
  }
}

/// First notice line that differed from the expected text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
  pub actual: String,
  pub expected: String,
}

/// Errors raised by the header parser.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
  /// The parser produced regions that do not add up to the input.
  #[error("Internal header parser error: {0}")]
  InternalState(String),
}

/// A file's lines, each keeping its terminator, followed by one synthetic
/// empty entry.
///
/// No real line is empty (every real line has content or a terminator), so
/// the synthetic entry is unambiguous. It lets a file consisting of only a
/// header reach the terminator check.
#[derive(Debug, Clone)]
pub struct FileLines<'a> {
  lines: Vec<&'a str>,
}

impl<'a> FileLines<'a> {
  pub fn new(content: &'a str) -> Self {
    let mut lines: Vec<&'a str> = content.split_inclusive('\n').collect();
    lines.push("");
    Self { lines }
  }

  /// Number of real lines.
  pub fn len(&self) -> usize {
    self.lines.len() - 1
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Real lines followed by the synthetic entry.
  pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
    self.lines.iter().copied()
  }
}

/// Outcome of parsing one file.
///
/// `before ++ header ++ after` reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult<'a> {
  pub state: HeaderState,
  pub before: Vec<&'a str>,
  pub header: Vec<&'a str>,
  pub after: Vec<&'a str>,
  pub mismatch: Option<Mismatch>,
}

impl ParseResult<'_> {
  pub fn is_ok(&self) -> bool {
    self.state == HeaderState::Ok
  }
}

/// Parse `text` against the header rendered for `format`.
pub fn parse<'a>(
  text: &'a str,
  rendered: &RenderedHeader,
  format: &FormatDescriptor,
) -> Result<ParseResult<'a>, HeaderError> {
  let lines = FileLines::new(text);
  let machine = HeaderMachine::new(rendered, format);

  let mut result = ParseResult {
    state: HeaderState::Missing,
    before: Vec::new(),
    header: Vec::new(),
    after: Vec::new(),
    mismatch: None,
  };

  let mut state = State::Start;
  for line in lines.iter() {
    let transition = machine.step(state, line);
    for effect in transition.effects {
      match effect {
        Effect::Before(l) => result.before.push(l),
        Effect::Header(l) => result.header.push(l),
        Effect::After(l) => result.after.push(l),
        Effect::Mismatch(m) => {
          if result.mismatch.is_none() {
            result.mismatch = Some(m);
          }
        }
      }
    }
    state = transition.next;
  }

  let (final_state, held) = machine.finish(state);
  result.before.extend(held);
  result.state = final_state;

  for region in [&mut result.before, &mut result.header, &mut result.after] {
    region.retain(|l| !l.is_empty());
  }

  let total = result.before.len() + result.header.len() + result.after.len();
  if total != lines.len() {
    return Err(HeaderError::InternalState(format!(
      "{} lines in, {} lines out",
      lines.len(),
      total
    )));
  }

  Ok(result)
}

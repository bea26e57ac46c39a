//! Per-line transition function of the header parser.
//!
//! [`HeaderMachine::step`] is pure: it takes the current [`State`] and one
//! line and returns the next state together with the [`Effect`]s the line
//! produced. Lines passed in keep their terminator; comparisons ignore it.

use super::Mismatch;
use crate::formats::FormatDescriptor;
use crate::notice::{NOTICE_OPENER, RenderedHeader};

/// Parser state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State<'a> {
  /// Scanning for a header.
  Start,
  /// A start-marker line was seen and is held until the next line decides
  /// whether it belongs to a header.
  Marker { held: Vec<&'a str> },
  /// The opener matched the first body line; verifying the second.
  Notice { held: Vec<&'a str> },
  /// The body matched up to (excluding) this index.
  Compare(usize),
  /// A stale header was found; consuming its remaining lines.
  FindEndAndFail,
  /// The header is compliant.
  Ok,
  /// The header is stale.
  Fail,
}

/// Output produced while consuming one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect<'a> {
  /// The line precedes any header.
  Before(&'a str),
  /// The line belongs to the existing header region.
  Header(&'a str),
  /// The line follows the header region.
  After(&'a str),
  /// A notice line differed from the expected text.
  Mismatch(Mismatch),
}

/// Result of one [`HeaderMachine::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<'a> {
  pub next: State<'a>,
  pub effects: Vec<Effect<'a>>,
}

impl<'a> Transition<'a> {
  fn to(next: State<'a>, effects: Vec<Effect<'a>>) -> Self {
    Self { next, effects }
  }

  /// Prepend `effects` to this transition.
  fn after(mut self, mut effects: Vec<Effect<'a>>) -> Self {
    effects.append(&mut self.effects);
    self.effects = effects;
    self
  }
}

/// Line content without its terminator.
pub fn content(line: &str) -> &str {
  line.trim_end_matches(['\n', '\r'])
}

/// Whether `line` looks like the first line of a notice in `format`.
///
/// Leading copies of the format's `line` and `start` markers are stripped as
/// whole strings, then any further non-space marker characters. One more
/// character (normally the separating space) is skipped, and the rest must
/// start with [`NOTICE_OPENER`].
pub fn is_notice_opener(line: &str, format: &FormatDescriptor) -> bool {
  let markers: Vec<&str> = [format.line.as_str(), format.start.as_str()]
    .into_iter()
    .filter(|m| !m.is_empty())
    .collect();

  let mut text = content(line);
  while let Some(rest) = markers.iter().find_map(|m| text.strip_prefix(m)) {
    text = rest;
  }
  let text = text.trim_start_matches(|c: char| !c.is_whitespace() && markers.iter().any(|m| m.contains(c)));

  let mut chars = text.chars();
  chars.next().is_some() && chars.as_str().starts_with(NOTICE_OPENER)
}

/// Transition function for one file format and rendered header.
#[derive(Debug, Clone, Copy)]
pub struct HeaderMachine<'r> {
  rendered: &'r RenderedHeader,
  format: &'r FormatDescriptor,
}

impl<'r> HeaderMachine<'r> {
  pub const fn new(rendered: &'r RenderedHeader, format: &'r FormatDescriptor) -> Self {
    Self { rendered, format }
  }

  /// Consume one line.
  pub fn step<'a>(&self, state: State<'a>, line: &'a str) -> Transition<'a> {
    match state {
      State::Start => self.scan(Vec::new(), line),
      State::Marker { held } => {
        if is_notice_opener(line, self.format) {
          self.scan(held, line)
        } else {
          let released = held.into_iter().map(Effect::Before).collect();
          self.step(State::Start, line).after(released)
        }
      }
      State::Notice { held } => self.second_line(held, line),
      State::Compare(index) => self.compare(index, line),
      State::FindEndAndFail => self.find_end(line),
      State::Ok => Transition::to(State::Ok, vec![Effect::After(line)]),
      State::Fail => Transition::to(State::Fail, vec![Effect::After(line)]),
    }
  }

  /// Resolve the end of input, returning the final state and any held lines.
  pub fn finish<'a>(&self, state: State<'a>) -> (super::HeaderState, Vec<&'a str>) {
    use super::HeaderState;

    match state {
      State::Start => (HeaderState::Missing, Vec::new()),
      State::Marker { held } | State::Notice { held } => (HeaderState::Missing, held),
      State::Compare(_) | State::FindEndAndFail | State::Fail => (HeaderState::Fail, Vec::new()),
      State::Ok => (HeaderState::Ok, Vec::new()),
    }
  }

  fn body(&self) -> &[String] {
    self.rendered.body()
  }

  fn mismatch(&self, line: &str, index: usize) -> Effect<'static> {
    Effect::Mismatch(Mismatch {
      actual: content(line).trim().to_string(),
      expected: self.body().get(index).map(|l| l.trim().to_string()).unwrap_or_default(),
    })
  }

  /// `Start` (with possibly held marker lines).
  fn scan<'a>(&self, mut held: Vec<&'a str>, line: &'a str) -> Transition<'a> {
    if held.is_empty()
      && let Some(start) = self.rendered.start()
      && is_marker_line(content(line), start)
    {
      held.push(line);
      return Transition::to(State::Marker { held }, Vec::new());
    }

    if !is_notice_opener(line, self.format) {
      debug_assert!(held.is_empty());
      let mut effects: Vec<Effect<'a>> = held.into_iter().map(Effect::Before).collect();
      effects.push(Effect::Before(line));
      return Transition::to(State::Start, effects);
    }

    // A notice under a missing or different start marker is stale.
    if let Some(start) = self.rendered.start()
      && held.first().is_none_or(|marker| content(marker) != start)
    {
      let actual = content(held.first().copied().unwrap_or(line)).trim().to_string();
      held.push(line);
      let mut effects: Vec<Effect<'a>> = held.into_iter().map(Effect::Header).collect();
      effects.push(Effect::Mismatch(Mismatch {
        actual,
        expected: start.trim().to_string(),
      }));
      return Transition::to(State::FindEndAndFail, effects);
    }

    held.push(line);

    if content(line) != self.body()[0] {
      let mut effects: Vec<Effect<'a>> = held.into_iter().map(Effect::Header).collect();
      effects.push(self.mismatch(line, 0));
      return Transition::to(State::FindEndAndFail, effects);
    }

    if self.body().len() == 1 {
      let effects = held.into_iter().map(Effect::Header).collect();
      return Transition::to(State::Compare(1), effects);
    }

    Transition::to(State::Notice { held }, Vec::new())
  }

  /// `Notice`: the opener matched, check the second body line.
  fn second_line<'a>(&self, mut held: Vec<&'a str>, line: &'a str) -> Transition<'a> {
    if content(line) == self.body()[1] {
      held.push(line);
      let effects = held.into_iter().map(Effect::Header).collect();
      return Transition::to(State::Compare(2), effects);
    }

    if self.is_continuation(line) {
      held.push(line);
      let mut effects: Vec<Effect<'a>> = held.into_iter().map(Effect::Header).collect();
      effects.push(self.mismatch(line, 1));
      return Transition::to(State::FindEndAndFail, effects);
    }

    // False positive: the opener was ordinary text.
    let released = held.into_iter().map(Effect::Before).collect();
    self.step(State::Start, line).after(released)
  }

  /// `Compare(index)`.
  fn compare<'a>(&self, index: usize, line: &'a str) -> Transition<'a> {
    if index >= self.body().len() {
      return if self.is_terminator(line) {
        Transition::to(State::Ok, vec![Effect::Header(line)])
      } else {
        Transition::to(State::Fail, vec![Effect::After(line)])
      };
    }

    if content(line) == self.body()[index] {
      return Transition::to(State::Compare(index + 1), vec![Effect::Header(line)]);
    }

    let mismatch = self.mismatch(line, index);
    self.find_end(line).after(vec![mismatch])
  }

  /// `FindEndAndFail`.
  fn find_end<'a>(&self, line: &'a str) -> Transition<'a> {
    let text = content(line);
    let end = self.format.end.as_str();

    if text.is_empty() || (!end.is_empty() && text.ends_with(end)) {
      return Transition::to(State::Fail, vec![Effect::Header(line)]);
    }

    if self.is_continuation(line) {
      return Transition::to(State::FindEndAndFail, vec![Effect::Header(line)]);
    }

    Transition::to(State::Fail, vec![Effect::After(line)])
  }

  /// A line that closes a fully matched body.
  ///
  /// With an empty end marker the suffix test is vacuous, so every line
  /// qualifies.
  fn is_terminator(&self, line: &str) -> bool {
    let text = content(line);
    let end = self.format.end.as_str();

    text.is_empty() || text == end || text.ends_with(end) || text == self.format.empty_line_marker()
  }

  /// A line that still looks like part of a comment block.
  fn is_continuation(&self, line: &str) -> bool {
    let text = content(line);
    let starts_with_marker = |marker: &str| !marker.is_empty() && text.starts_with(marker);

    starts_with_marker(&self.format.line)
      || starts_with_marker(&self.format.start)
      || text.starts_with(" *")
      || text.starts_with("    ")
  }
}

/// The start marker itself, or a differently sized run of the character a
/// single-character banner is made of.
fn is_marker_line(text: &str, start: &str) -> bool {
  if text == start {
    return true;
  }

  let mut fill = start.chars();
  match fill.next() {
    Some(c) if fill.all(|f| f == c) => text.chars().count() >= 3 && text.chars().all(|t| t == c),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::formats::lookup;
  use crate::notice::{NoticeText, render};

  fn setup(ext: &str) -> (RenderedHeader, FormatDescriptor) {
    let format = lookup(ext).expect("known extension");
    let notice = NoticeText::new(["Copyright (c) 2024 Example", "SPDX-License-Identifier: Apache-2.0"])
      .expect("non-empty notice");
    (render(&notice, &format), format)
  }

  #[test]
  fn test_is_notice_opener() {
    let py = lookup("py").expect("py format");
    let rs = lookup("rs").expect("rs format");
    let css = lookup("css").expect("css format");

    assert!(is_notice_opener("# Copyright (c) 2020 Someone\n", &py));
    assert!(is_notice_opener("## Copyright (c) 2020 Someone", &py));
    assert!(is_notice_opener("// Copyright (c) 2020 Someone\r\n", &rs));
    assert!(is_notice_opener("/// Copyright (c) 2020 Someone\n", &rs));
    assert!(is_notice_opener("/* Copyright (c) 2020 Someone */\n", &css));

    assert!(!is_notice_opener("#Copyright (c) 2020", &py));
    assert!(!is_notice_opener("# copyright (c) 2020", &py));
    assert!(!is_notice_opener("import os\n", &py));
    assert!(!is_notice_opener("#", &py));
    assert!(!is_notice_opener("", &py));
  }

  #[test]
  fn test_is_notice_opener_with_spaced_line_prefix() {
    let block = FormatDescriptor {
      start: "/*".to_string(),
      end: " */".to_string(),
      ..FormatDescriptor::line(" *")
    };

    assert!(is_notice_opener(" * Copyright (c) 2020 Someone\n", &block));
    assert!(is_notice_opener("/* Copyright (c) 2020 Someone\n", &block));
    assert!(!is_notice_opener(" *Copyright (c) 2020\n", &block));
    assert!(!is_notice_opener(" * copyright (c) 2020\n", &block));
  }

  #[test]
  fn test_marker_line() {
    let banner = "#".repeat(80);

    assert!(is_marker_line(&banner, &banner));
    assert!(is_marker_line(&"#".repeat(40), &banner));
    assert!(!is_marker_line("##", &banner));
    assert!(!is_marker_line("# Section", &banner));
    assert!(!is_marker_line("", &banner));

    assert!(is_marker_line("/*", "/*"));
    assert!(!is_marker_line("/**", "/*"));
  }

  #[test]
  fn test_is_notice_opener_handles_multibyte_characters() {
    let py = lookup("py").expect("py format");

    assert!(is_notice_opener("#\u{a0}Copyright (c) 2020", &py));
    assert!(!is_notice_opener("# \u{e9}", &py));
  }

  #[test]
  fn test_start_holds_marker_line() {
    let (rendered, format) = setup("py");
    let machine = HeaderMachine::new(&rendered, &format);
    let banner = format!("{}\n", "#".repeat(80));

    let t = machine.step(State::Start, &banner);
    assert_eq!(t.next, State::Marker { held: vec![banner.as_str()] });
    assert!(t.effects.is_empty());
  }

  #[test]
  fn test_opener_without_start_marker_fails() {
    let (rendered, format) = setup("py");
    let machine = HeaderMachine::new(&rendered, &format);

    let t = machine.step(State::Start, "# Copyright (c) 2024 Example\n");
    assert_eq!(t.next, State::FindEndAndFail);
    assert_eq!(
      t.effects,
      vec![
        Effect::Header("# Copyright (c) 2024 Example\n"),
        Effect::Mismatch(Mismatch {
          actual: "# Copyright (c) 2024 Example".to_string(),
          expected: "#".repeat(80),
        })
      ]
    );
  }

  #[test]
  fn test_opener_under_wrong_width_banner_fails() {
    let (rendered, format) = setup("py");
    let machine = HeaderMachine::new(&rendered, &format);
    let short = format!("{}\n", "#".repeat(40));

    let t = machine.step(State::Start, &short);
    assert_eq!(t.next, State::Marker { held: vec![short.as_str()] });

    let t = machine.step(t.next, "# Copyright (c) 2024 Example\n");
    assert_eq!(t.next, State::FindEndAndFail);
    assert_eq!(t.effects[0], Effect::Header(&short));
    assert!(matches!(&t.effects[2], Effect::Mismatch(m) if m.actual == "#".repeat(40)));
  }

  #[test]
  fn test_marker_released_when_not_followed_by_opener() {
    let (rendered, format) = setup("py");
    let machine = HeaderMachine::new(&rendered, &format);
    let banner = format!("{}\n", "#".repeat(80));

    let t = machine.step(State::Marker { held: vec![banner.as_str()] }, "import os\n");
    assert_eq!(t.next, State::Start);
    assert_eq!(t.effects, vec![Effect::Before(&banner), Effect::Before("import os\n")]);
  }

  #[test]
  fn test_matching_opener_moves_to_notice() {
    let (rendered, format) = setup("rs");
    let machine = HeaderMachine::new(&rendered, &format);

    let t = machine.step(State::Start, "// Copyright (c) 2024 Example\n");
    assert_eq!(t.next, State::Notice { held: vec!["// Copyright (c) 2024 Example\n"] });

    let t = machine.step(t.next, "// SPDX-License-Identifier: Apache-2.0\n");
    assert_eq!(t.next, State::Compare(2));
    assert_eq!(
      t.effects,
      vec![
        Effect::Header("// Copyright (c) 2024 Example\n"),
        Effect::Header("// SPDX-License-Identifier: Apache-2.0\n")
      ]
    );
  }

  #[test]
  fn test_differing_opener_fails() {
    let (rendered, format) = setup("rs");
    let machine = HeaderMachine::new(&rendered, &format);

    let t = machine.step(State::Start, "// Copyright (c) 2023 Example\n");
    assert_eq!(t.next, State::FindEndAndFail);
    assert_eq!(
      t.effects,
      vec![
        Effect::Header("// Copyright (c) 2023 Example\n"),
        Effect::Mismatch(Mismatch {
          actual: "// Copyright (c) 2023 Example".to_string(),
          expected: "// Copyright (c) 2024 Example".to_string(),
        })
      ]
    );
  }

  #[test]
  fn test_second_line_difference_fails() {
    let (rendered, format) = setup("rs");
    let machine = HeaderMachine::new(&rendered, &format);

    let state = State::Notice { held: vec!["// Copyright (c) 2024 Example\n"] };
    let t = machine.step(state, "// SPDX-License-Identifier: MIT\n");

    assert_eq!(t.next, State::FindEndAndFail);
    assert!(matches!(t.effects.last(), Some(Effect::Mismatch(_))));
  }

  #[test]
  fn test_false_positive_opener_is_requeued() {
    let (rendered, format) = setup("rs");
    let machine = HeaderMachine::new(&rendered, &format);

    let state = State::Notice { held: vec!["// Copyright (c) 2024 Example\n"] };
    let t = machine.step(state, "fn main() {}\n");

    assert_eq!(t.next, State::Start);
    assert_eq!(
      t.effects,
      vec![
        Effect::Before("// Copyright (c) 2024 Example\n"),
        Effect::Before("fn main() {}\n")
      ]
    );
  }

  #[test]
  fn test_compare_terminator_with_empty_end_accepts_any_line() {
    let (rendered, format) = setup("rs");
    let machine = HeaderMachine::new(&rendered, &format);

    let t = machine.step(State::Compare(2), "fn main() {}\n");
    assert_eq!(t.next, State::Ok);
    assert_eq!(t.effects, vec![Effect::Header("fn main() {}\n")]);
  }

  #[test]
  fn test_compare_terminator_with_end_marker() {
    let (rendered, format) = setup("css");
    let machine = HeaderMachine::new(&rendered, &format);

    assert_eq!(machine.step(State::Compare(2), "\n").next, State::Ok);
    assert_eq!(machine.step(State::Compare(2), "/* extra */\n").next, State::Ok);

    let t = machine.step(State::Compare(2), "body { margin: 0; }\n");
    assert_eq!(t.next, State::Fail);
    assert_eq!(t.effects, vec![Effect::After("body { margin: 0; }\n")]);
  }

  #[test]
  fn test_find_end_consumes_comment_lines() {
    let (rendered, format) = setup("py");
    let machine = HeaderMachine::new(&rendered, &format);

    let t = machine.step(State::FindEndAndFail, "# more legal text\n");
    assert_eq!(t.next, State::FindEndAndFail);

    let t = machine.step(State::FindEndAndFail, "    indented\n");
    assert_eq!(t.next, State::FindEndAndFail);

    let t = machine.step(State::FindEndAndFail, "\n");
    assert_eq!(t.next, State::Fail);
    assert_eq!(t.effects, vec![Effect::Header("\n")]);

    let t = machine.step(State::FindEndAndFail, "import os\n");
    assert_eq!(t.next, State::Fail);
    assert_eq!(t.effects, vec![Effect::After("import os\n")]);
  }

  #[test]
  fn test_ok_and_fail_pass_lines_through() {
    let (rendered, format) = setup("py");
    let machine = HeaderMachine::new(&rendered, &format);

    assert_eq!(machine.step(State::Ok, "x\n").effects, vec![Effect::After("x\n")]);
    assert_eq!(machine.step(State::Fail, "x\n").effects, vec![Effect::After("x\n")]);
  }
}

//! Composes the corrected content of a non-compliant file.

use super::{HeaderState, ParseResult};
use crate::formats::FormatDescriptor;
use crate::notice::RenderedHeader;

/// Build the content a file should have, or `None` when it is compliant.
///
/// - `Fail`: the stale header region is replaced in place.
/// - `Missing` with a skip prefix: leading lines starting with the prefix
///   (such as a shebang) stay first, the header follows them.
/// - `Missing` otherwise: the header is prepended.
pub fn compose(result: &ParseResult<'_>, rendered: &RenderedHeader, format: &FormatDescriptor) -> Option<String> {
  let block = rendered.block();

  match result.state {
    HeaderState::Ok => None,
    HeaderState::Fail => {
      let mut out = String::new();
      out.extend(result.before.iter().copied());
      out.push_str(&block);
      out.extend(result.after.iter().copied());
      Some(out)
    }
    HeaderState::Missing => {
      let kept = match format.skip.as_deref() {
        Some(skip) if !skip.is_empty() => result.before.iter().take_while(|l| l.starts_with(skip)).count(),
        _ => 0,
      };

      let mut out = String::new();
      for line in &result.before[..kept] {
        out.push_str(line);
        if !line.ends_with('\n') {
          out.push('\n');
        }
      }
      out.push_str(&block);
      out.extend(result.before[kept..].iter().copied());
      Some(out)
    }
  }
}

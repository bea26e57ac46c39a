//! # Formats Module
//!
//! This module maps file extensions to the comment format used for the notice
//! header in that kind of file.
//!
//! The module includes:
//! - [`FormatDescriptor`] describing the markers of one comment format
//! - [`lookup`] for the built-in extension table
//! - [`FormatResolver`] implementations that layer configuration overrides on
//!   top of the built-in table
//!
//! A path whose extension has no descriptor is not a recognized text type and
//! is skipped entirely.

use std::collections::HashMap;
use std::path::Path;

use crate::config::{Config, FormatConfig};
use crate::verbose_log;

/// Width of the banner line used as start marker by the `#`, `-` and `%`
/// comment families.
const BANNER_WIDTH: usize = 80;

/// Describes how the notice header is commented in one file type.
///
/// # Fields
///
/// * `start` - Line placed before the notice (e.g. a row of `#`), or the
///   opening marker wrapped around each line when `line` is empty
/// * `line` - Prefix for every notice line (e.g. `//`)
/// * `end` - Closing marker; a line of its own for prefixed formats, the
///   trailing marker of each line for wrapped ones
/// * `empty_line` - Replacement for blank notice lines; falls back to `line`
/// * `skip` - Prefix of leading lines (e.g. `#!`) that must stay above a newly
///   inserted header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
  /// Start marker
  pub start: String,

  /// Per-line prefix
  pub line: String,

  /// End marker
  pub end: String,

  /// Marker used for blank notice lines
  pub empty_line: Option<String>,

  /// Prefix of lines preserved ahead of an inserted header
  pub skip: Option<String>,
}

impl FormatDescriptor {
  /// Create a line-comment format without start or end markers.
  ///
  /// # Arguments
  ///
  /// * `prefix` - The prefix to use for each line (e.g., "//")
  pub fn line(prefix: &str) -> Self {
    Self {
      start: String::new(),
      line: prefix.to_string(),
      end: String::new(),
      empty_line: None,
      skip: None,
    }
  }

  /// Create a line-comment format opened by a banner line of `fill`
  /// characters.
  pub fn banner(fill: char, prefix: &str) -> Self {
    Self {
      start: fill.to_string().repeat(BANNER_WIDTH),
      ..Self::line(prefix)
    }
  }

  /// Create a format where every notice line is wrapped in `start` and `end`
  /// (e.g. `/* ... */`).
  pub fn wrapped(start: &str, end: &str) -> Self {
    Self {
      start: start.to_string(),
      line: String::new(),
      end: end.to_string(),
      empty_line: None,
      skip: None,
    }
  }

  /// Set the prefix of lines kept above an inserted header.
  pub fn with_skip(mut self, skip: &str) -> Self {
    self.skip = Some(skip.to_string());
    self
  }

  /// Whether notice lines are wrapped rather than prefixed.
  pub fn is_wrapped(&self) -> bool {
    self.line.is_empty()
  }

  /// The line used for a blank notice line.
  pub fn empty_line_marker(&self) -> &str {
    self.empty_line.as_deref().unwrap_or(&self.line)
  }
}

impl From<&FormatConfig> for FormatDescriptor {
  fn from(config: &FormatConfig) -> Self {
    Self {
      start: config.start.clone(),
      line: config.line.clone(),
      end: config.end.clone(),
      empty_line: config.empty_line.clone(),
      skip: config.skip.clone(),
    }
  }
}

/// Looks up the built-in format descriptor for a file extension.
///
/// The extension is given without the leading dot and matched
/// case-insensitively. Returns `None` for extensions that are not recognized
/// text types.
///
/// # Supported File Types
///
/// - Scripts and data (`py`, `sh`, `bzl`, `yaml`, ...): `#` banner and prefix
/// - Haskell family and DAML: `-` banner, `--` prefix
/// - C family, JVM and web languages: `//` prefix
/// - TeX: `%` banner and prefix
/// - CSS and HTML: each line wrapped in `/* */` or `<!-- -->`
pub fn lookup(extension: &str) -> Option<FormatDescriptor> {
  let format = match extension.to_lowercase().as_str() {
    "bat" | "cmd" => FormatDescriptor {
      start: "::".to_string(),
      ..FormatDescriptor::line("::")
    },
    "bats" | "bazel" | "bzl" | "py" | "sh" => FormatDescriptor::banner('#', "#").with_skip("#!"),
    "rb" | "tf" | "yaml" | "yml" | "toml" => FormatDescriptor::banner('#', "#"),
    "hs" => FormatDescriptor::banner('-', "--").with_skip("#!"),
    "chs" | "daml" | "lhs" => FormatDescriptor::banner('-', "--"),
    "c" | "cc" | "cpp" | "h" | "hh" | "hpp" | "groovy" | "proto" | "java" | "js" | "lf" | "scala" | "ts" | "tsx"
    | "rs" | "go" => FormatDescriptor::line("//"),
    "sql" => FormatDescriptor::line("--"),
    "rst" => FormatDescriptor::line(".."),
    "tex" => FormatDescriptor::banner('%', "%"),
    "css" | "scss" => FormatDescriptor::wrapped("/*", "*/"),
    "html" => FormatDescriptor::wrapped("<!--", "-->").with_skip("<!"),
    _ => return None,
  };

  Some(format)
}

/// Lowercased extension of `path`, if any.
fn extension_of(path: &Path) -> Option<String> {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(|ext| ext.to_lowercase())
}

/// Trait for resolving the format descriptor of a file path.
pub trait FormatResolver: Send + Sync {
  /// Resolve the format for the given file, or `None` when the file is not a
  /// recognized text type.
  fn resolve(&self, path: &Path) -> Option<FormatDescriptor>;
}

/// Resolver backed by the built-in extension table only.
#[derive(Debug, Default)]
pub struct BuiltinResolver;

impl FormatResolver for BuiltinResolver {
  fn resolve(&self, path: &Path) -> Option<FormatDescriptor> {
    extension_of(path).and_then(|ext| lookup(&ext))
  }
}

/// Resolver that checks configured formats first, then falls back to the
/// built-in table.
#[derive(Debug)]
pub struct ConfigurableResolver {
  overrides: HashMap<String, FormatDescriptor>,
}

impl ConfigurableResolver {
  /// Create a resolver from the `[formats]` table of a loaded configuration.
  pub fn new(config: &Config) -> Self {
    let overrides = config
      .formats
      .iter()
      .map(|(ext, format)| (ext.to_lowercase(), FormatDescriptor::from(format)))
      .collect();

    Self { overrides }
  }
}

impl FormatResolver for ConfigurableResolver {
  fn resolve(&self, path: &Path) -> Option<FormatDescriptor> {
    let extension = extension_of(path)?;

    if let Some(format) = self.overrides.get(&extension) {
      verbose_log!("Using configured format for: .{}", extension);
      return Some(format.clone());
    }

    lookup(&extension)
  }
}

/// Create a format resolver based on the provided configuration.
///
/// A configuration with a non-empty `[formats]` table yields a
/// [`ConfigurableResolver`]; otherwise the [`BuiltinResolver`] is used.
pub fn create_resolver(config: Option<&Config>) -> Box<dyn FormatResolver> {
  match config {
    Some(cfg) if !cfg.formats.is_empty() => Box::new(ConfigurableResolver::new(cfg)),
    _ => Box::new(BuiltinResolver),
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::*;

  #[test]
  fn test_lookup_python_has_banner_and_skip() {
    let format = lookup("py").expect("py is a known extension");

    assert_eq!(format.start, "#".repeat(80));
    assert_eq!(format.line, "#");
    assert_eq!(format.end, "");
    assert_eq!(format.skip.as_deref(), Some("#!"));
  }

  #[test]
  fn test_lookup_c_family_has_no_start_marker() {
    for ext in ["c", "cpp", "h", "java", "ts", "proto"] {
      let format = lookup(ext).expect("known extension");
      assert_eq!(format.start, "", "{ext} should not open a block comment");
      assert_eq!(format.line, "//");
    }
  }

  #[test]
  fn test_lookup_css_is_wrapped() {
    let format = lookup("css").expect("css is a known extension");

    assert!(format.is_wrapped());
    assert_eq!(format.start, "/*");
    assert_eq!(format.end, "*/");
  }

  #[test]
  fn test_lookup_is_case_insensitive() {
    assert_eq!(lookup("PY"), lookup("py"));
  }

  #[test]
  fn test_lookup_unknown_extension() {
    assert!(lookup("xyz").is_none());
    assert!(lookup("").is_none());
    assert!(lookup("md").is_none());
  }

  #[test]
  fn test_empty_line_marker_falls_back_to_line_prefix() {
    let format = FormatDescriptor::line("//");
    assert_eq!(format.empty_line_marker(), "//");

    let format = FormatDescriptor {
      empty_line: Some(String::new()),
      ..FormatDescriptor::line("//")
    };
    assert_eq!(format.empty_line_marker(), "");
  }

  #[test]
  fn test_builtin_resolver() {
    let resolver = BuiltinResolver;

    assert_eq!(resolver.resolve(Path::new("src/lib.rs")), lookup("rs"));
    assert_eq!(resolver.resolve(Path::new("deploy/run.SH")), lookup("sh"));
    assert!(resolver.resolve(Path::new("README")).is_none());
    assert!(resolver.resolve(Path::new("notes.txt")).is_none());
  }

  #[test]
  fn test_configurable_resolver_override_and_fallback() {
    let mut formats = HashMap::new();
    formats.insert(
      "py".to_string(),
      FormatConfig {
        start: String::new(),
        line: "##".to_string(),
        end: String::new(),
        empty_line: None,
        skip: None,
      },
    );
    formats.insert(
      "xyz".to_string(),
      FormatConfig {
        start: String::new(),
        line: ";;".to_string(),
        end: String::new(),
        empty_line: None,
        skip: None,
      },
    );
    let config = Config {
      formats,
      ..Config::default()
    };

    let resolver = ConfigurableResolver::new(&config);

    assert_eq!(
      resolver.resolve(Path::new("a.py")).map(|f| f.line),
      Some("##".to_string())
    );
    assert_eq!(
      resolver.resolve(Path::new("a.xyz")).map(|f| f.line),
      Some(";;".to_string())
    );
    assert_eq!(resolver.resolve(Path::new("a.rs")), lookup("rs"));
  }

  #[test]
  fn test_create_resolver_without_formats_uses_builtin() {
    let resolver = create_resolver(Some(&Config::default()));
    assert_eq!(resolver.resolve(Path::new("main.go")), lookup("go"));

    let resolver = create_resolver(None);
    assert!(resolver.resolve(Path::new("main.xyz")).is_none());
  }
}

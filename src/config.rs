//! # Configuration Module
//!
//! This module provides configuration support for notice-headers, allowing
//! users to relocate the notice file, change the default directory and the
//! opt-out marker, and add or override comment formats per extension.
//!
//! Configuration can be specified in a `.notice-headers.toml` file at the
//! repository root or via the `NOTICE_HEADERS_CONFIG` environment variable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".notice-headers.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "NOTICE_HEADERS_CONFIG";

/// Notice file read from the repository root unless configured otherwise.
pub const DEFAULT_NOTICE_FILE: &str = "COPY";

/// Directory processed when none is given on the command line.
pub const DEFAULT_DIRECTORY: &str = ".";

/// Name of the file that opts a directory tree out of header enforcement.
pub const DEFAULT_OPT_OUT_MARKER: &str = "NO_AUTO_COPYRIGHT";

/// User-defined comment format for one extension.
///
/// Mirrors [`FormatDescriptor`](crate::formats::FormatDescriptor); every field
/// except `line` defaults to empty.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct FormatConfig {
  /// Start marker line, or the opening marker of wrapped formats.
  #[serde(default)]
  pub start: String,

  /// Prefix of each notice line. Empty for wrapped formats.
  #[serde(default)]
  pub line: String,

  /// End marker.
  #[serde(default)]
  pub end: String,

  /// Line used for blank notice lines.
  #[serde(default)]
  pub empty_line: Option<String>,

  /// Prefix of leading lines kept above an inserted header.
  #[serde(default)]
  pub skip: Option<String>,
}

/// Main configuration struct for notice-headers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
  /// Notice file, relative to the repository root.
  #[serde(default)]
  pub notice_file: Option<PathBuf>,

  /// Directory processed when none is given on the command line.
  #[serde(default)]
  pub default_directory: Option<PathBuf>,

  /// File name of the opt-out marker.
  #[serde(default)]
  pub opt_out_marker: Option<String>,

  /// Comment formats keyed by extension without the leading dot.
  #[serde(default)]
  pub formats: HashMap<String, FormatConfig>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A format configuration is invalid.
  #[error("Invalid format for '{extension}': {message}")]
  InvalidFormat { extension: String, message: String },

  /// The opt-out marker is not a plain file name.
  #[error("Invalid opt-out marker '{0}': must be a file name without separators")]
  InvalidMarker(String),
}

impl Config {
  /// Load configuration from a file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    let config = config.normalize();

    verbose_log!("Loaded {} format overrides", config.formats.len());

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - Extension keys don't include the leading dot
  /// - Wrapped formats (empty `line`) have a start marker
  /// - The opt-out marker is a bare file name
  fn validate(&self) -> Result<(), ConfigError> {
    for (ext, format) in &self.formats {
      if ext.starts_with('.') {
        return Err(ConfigError::InvalidFormat {
          extension: ext.clone(),
          message: "extension should not include leading dot".to_string(),
        });
      }

      if format.line.is_empty() && format.start.is_empty() {
        return Err(ConfigError::InvalidFormat {
          extension: ext.clone(),
          message: "either line or start must be set".to_string(),
        });
      }
    }

    if let Some(ref marker) = self.opt_out_marker
      && (marker.is_empty() || marker.contains('/') || marker.contains('\\') || marker == "." || marker == "..")
    {
      return Err(ConfigError::InvalidMarker(marker.clone()));
    }

    Ok(())
  }

  /// Normalize extension keys to lowercase for case-insensitive matching.
  fn normalize(self) -> Self {
    let formats = self.formats.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect();

    Self { formats, ..self }
  }

  /// Notice file path, relative to the repository root.
  pub fn notice_file(&self) -> &Path {
    self
      .notice_file
      .as_deref()
      .unwrap_or_else(|| Path::new(DEFAULT_NOTICE_FILE))
  }

  /// Directory processed when none is given on the command line.
  pub fn default_directory(&self) -> &Path {
    self
      .default_directory
      .as_deref()
      .unwrap_or_else(|| Path::new(DEFAULT_DIRECTORY))
  }

  /// File name of the opt-out marker.
  pub fn opt_out_marker(&self) -> &str {
    self.opt_out_marker.as_deref().unwrap_or(DEFAULT_OPT_OUT_MARKER)
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`), relative
///    to the repository root unless absolute. It is returned even when it does
///    not exist so that loading reports the error.
/// 2. Path specified via `NOTICE_HEADERS_CONFIG` environment variable
/// 3. `.notice-headers.toml` in the repository root
pub fn discover_config_path(explicit_path: Option<&Path>, workspace_root: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    let path = if path.is_absolute() {
      path.to_path_buf()
    } else {
      workspace_root.join(path)
    };
    verbose_log!("Using explicit config path: {}", path.display());
    return Some(path);
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let workspace_config = workspace_root.join(DEFAULT_CONFIG_FILENAME);
  if workspace_config.exists() {
    verbose_log!("Using workspace config: {}", workspace_config.display());
    return Some(workspace_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// Returns `Ok(None)` when discovery is disabled or no file is found.
pub fn load_config(explicit_path: Option<&Path>, workspace_root: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, workspace_root) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}

//! # CLI Module
//!
//! Command-line interface: `notice-headers <check|update> [DIRECTORY]`.

mod run;

use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand};
pub use run::{RunArgs, run};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Check that all tracked files carry the notice in COPY
  notice-headers check

  # Add or update headers below a directory of the repository
  notice-headers update pkgs/

  # Preview the changes update would make
  notice-headers check --show-diff

  # Exclude a directory and everything below it
  touch vendor/NO_AUTO_COPYRIGHT
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Verify headers without modifying files; exits 1 when any file fails
  Check(RunArgs),
  /// Insert missing headers and replace out-of-date ones
  Update(RunArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

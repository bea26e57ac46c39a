//! # Run Command
//!
//! Shared implementation of the `check` and `update` subcommands.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use notice_headers::config::{Config, load_config};
use notice_headers::diff::DiffManager;
use notice_headers::formats::create_resolver;
use notice_headers::info_log;
use notice_headers::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use notice_headers::notice::NoticeText;
use notice_headers::output::{
  print_all_files_ok, print_blank_line, print_check_failed_hint, print_start_message, print_summary,
};
use notice_headers::processor::{Processor, ProcessorConfig};
use notice_headers::report::{ProcessingSummary, write_json_report};
use notice_headers::workspace::resolve_workspace;
use tracing::debug;

/// Arguments shared by `check` and `update`
#[derive(Args, Debug)]
pub struct RunArgs {
  /// Directory to process, relative to the repository root (default: the
  /// configured default directory, or the whole repository)
  #[arg(value_name = "DIRECTORY")]
  pub directory: Option<PathBuf>,

  /// Config file, relative to the repository root (default:
  /// .notice-headers.toml in the repository root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Notice file, relative to the repository root (default: COPY)
  #[arg(long, short = 'f', value_name = "FILE")]
  pub notice_file: Option<PathBuf>,

  /// Show a diff of the changes update would make (check only)
  #[arg(long)]
  pub show_diff: bool,

  /// Save a diff of the changes update would make to a file (check only)
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// Write a JSON report of every file's status to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Only print failing files and errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,

  /// Skip git repository ownership check. Useful when running in Docker or
  /// other containerized environments where the repository may be owned by a
  /// different user.
  #[arg(long)]
  pub skip_git_owner_check: bool,
}

/// Run `check` (`check_only`) or `update` with the given arguments.
pub fn run(args: RunArgs, check_only: bool) -> Result<()> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  if let (Some(hash), Some(date)) = (option_env!("GIT_HASH"), option_env!("GIT_DATE")) {
    debug!("notice-headers {} ({} {})", env!("CARGO_PKG_VERSION"), hash, date);
  }

  if args.skip_git_owner_check {
    debug!("Disabling git repository ownership check");
    // SAFETY: No git operations have started yet; this runs before any
    // Repository is opened.
    unsafe {
      let _ = git2::opts::set_verify_owner_validation(false);
    }
  }

  if !check_only && (args.show_diff || args.save_diff.is_some()) {
    eprintln!("Warning: --show-diff and --save-diff only apply to check");
  }

  let workspace = resolve_workspace()?;
  let root = workspace.root().to_path_buf();
  debug!("Using repository root: {}", root.display());

  let config = load_config(args.config.as_deref(), &root, args.no_config)?;
  let defaults = Config::default();
  let settings = config.as_ref().unwrap_or(&defaults);

  let notice_path = resolve_in_root(&root, args.notice_file.as_deref().unwrap_or(settings.notice_file()));
  let notice = NoticeText::load(&notice_path)
    .with_context(|| format!("Failed to load notice from {}", notice_path.display()))?;

  let directory = args.directory.as_deref().unwrap_or(settings.default_directory());
  let directory = workspace.relative_dir(directory)?;

  let diff_manager = DiffManager::new(args.show_diff && check_only, args.save_diff.filter(|_| check_only));
  diff_manager.init()?;

  let mut processor = Processor::new(ProcessorConfig {
    check_only,
    resolver: create_resolver(config.as_ref()),
    opt_out_marker: settings.opt_out_marker().to_string(),
    diff_manager: Some(diff_manager),
    ..ProcessorConfig::new(notice, root)
  });

  let files = processor.collect_files(&directory)?;
  print_start_message(files.len(), !check_only);

  let start_time = Instant::now();
  let failed = processor.process_files(&files)?;
  let elapsed = start_time.elapsed();

  let file_reports = processor.take_reports();
  let summary = ProcessingSummary::from_reports(&file_reports, elapsed);

  if summary.non_compliant() == 0 {
    print_blank_line();
    print_all_files_ok();
  }

  print_blank_line();
  print_summary(&summary, check_only);

  if let Some(ref output_path) = args.report_json {
    write_json_report(output_path, &file_reports, &summary)?;
    info_log!("Generated JSON report at {}", output_path.display());
  }

  if failed {
    print_blank_line();
    print_check_failed_hint();
    process::exit(1);
  }

  Ok(())
}

/// Interpret `path` relative to the repository root unless it is absolute.
fn resolve_in_root(root: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    root.join(path)
  }
}

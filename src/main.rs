//! # notice-headers
//!
//! Idempotently adds, verifies and updates copyright notice headers in the
//! files of a git repository.

mod cli;

use anyhow::Result;

use crate::cli::{Cli, Command, run};

fn main() -> Result<()> {
  let cli = Cli::parse_args();

  match cli.command {
    Command::Check(args) => run(args, true),
    Command::Update(args) => run(args, false),
  }
}

//! # notice-headers
//!
//! Idempotently inserts, verifies and updates a canonical legal-notice header
//! at the top of the source files tracked in a git repository.
//!
//! For every tracked file with a recognized extension the existing header is
//! located and compared line by line with the notice rendered for that file
//! type. The file is then compliant, missing a header, or has a stale header
//! that is replaced in place. Directories containing a `NO_AUTO_COPYRIGHT`
//! file are skipped together with everything below them.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//!
//! use notice_headers::notice::NoticeText;
//! use notice_headers::processor::{Processor, ProcessorConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = PathBuf::from("/path/to/repo");
//!     let notice = NoticeText::load(&root.join("COPY"))?;
//!
//!     let mut processor = Processor::new(ProcessorConfig {
//!         check_only: true,
//!         ..ProcessorConfig::new(notice, root)
//!     });
//!
//!     let files = processor.collect_files(Path::new("."))?;
//!     if processor.process_files(&files)? {
//!         println!("Some files need their copyright header updated");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`header`] - Header detection state machine and rewriting
//! * [`notice`] - Notice loading and rendering
//! * [`formats`] - Comment formats per file extension
//! * [`processor`] - Per-file orchestration
//! * [`logging`] - Logging utilities for verbose output

pub mod config;
pub mod diff;
pub mod file_filter;
pub mod formats;
pub mod git;
pub mod header;
pub mod logging;
pub mod notice;
pub mod opt_out;
pub mod output;
pub mod processor;
pub mod report;
pub mod workspace;

//! Bundle size checks for front-end build output.
//!
//! This crate measures the gzip size of built files (bundles) matched by the
//! file groups of a `.bundlesizerc.json` config and compares each against the
//! group's limit.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use bundlesize_check::{check_files, print_table};
//! use bundlesize_core::load_config;
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cwd = std::env::current_dir()?;
//! let config = load_config(None, &cwd)?;
//! let report = check_files(&config, &cwd)?;
//!
//! // Use buffered output for better performance
//! let mut stdout = BufWriter::new(std::io::stdout());
//! print_table(&mut stdout, &report)?;
//! stdout.flush()?;
//!
//! if !report.all_passed {
//!     std::process::exit(1);
//! }
//! # Ok(())
//! # }
//! ```

mod checker;
mod options;
mod reporter;
mod watch;

// Re-export public API
pub use checker::check_files;
pub use options::Options;
pub use reporter::{print_json, print_report, print_size_diff, print_table};
pub use watch::{ChangeDebouncer, WatchSession, resolve_watch_targets};

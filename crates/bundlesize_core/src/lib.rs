//! Core building blocks for bundle size checks.
//!
//! This crate provides the pieces the checker is assembled from:
//! - Parsing and formatting human-readable sizes (`100KB`, `2.50MB`)
//! - Matching paths against the restricted glob dialect of file groups
//! - Scanning a directory tree for files matching a group
//! - Measuring the gzip size of a file
//! - Loading and initializing the `.bundlesizerc.json` config

mod config;
mod constants;
mod errors;
mod glob;
mod gzip;
mod scanner;
mod size;
mod types;

// Re-export public API
pub use config::{init_config, load_config, parse_config, resolve_config_path};
pub use constants::{
    DEBOUNCE_WINDOW, DEFAULT_CONFIG_PATH, DEFAULT_FILE_GROUPS, GIB, KIB, MIB, SIZE_UNITS,
    WATCH_POLL_INTERVAL,
};
pub use errors::{BundleSizeError, Result};
pub use glob::{GlobPattern, match_glob};
pub use gzip::{gzip_len, gzip_size};
pub use scanner::{ScannedFile, find_files, relative_display};
pub use size::{format_size, format_size_delta, parse_size};
pub use types::{CheckReport, Config, FileGroup, FileResult, Status};

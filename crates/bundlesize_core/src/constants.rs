//! Constants shared by the loader, the size parser and the watch loop.
//!
//! ## Size Units
//!
//! Units are binary multiples: `KB` is 1024 bytes, `MB` is 1024², `GB` is 1024³.
//! The same suffixes are used when parsing limits and when printing sizes.

use std::time::Duration;

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = ".bundlesizerc.json";

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;

/// Size unit suffixes and their byte multipliers, smallest first
pub const SIZE_UNITS: &[(&str, u64)] = &[
    ("B", 1),    // bytes
    ("KB", KIB), // kibibytes
    ("MB", MIB), // mebibytes
    ("GB", GIB), // gibibytes
];

/// File groups written by `init_config`, as `(pattern, max size)`
pub const DEFAULT_FILE_GROUPS: &[(&str, &str)] = &[("dist/*.js", "100KB"), ("dist/*.css", "20KB")];

/// Change events whose modification time is closer than this to the last one are ignored
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// How long the watch loop blocks before re-checking the shutdown flag
pub const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(250);

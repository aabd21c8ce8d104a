//! Human-readable byte sizes.
//!
//! Limits in the config are written as `<number><unit>` (`"100KB"`, `"2.5 mb"`).
//! [`parse_size`] turns them into byte counts and [`format_size`] prints byte
//! counts back with the same unit suffixes.

use std::sync::LazyLock;

use log::trace;
use regex::Regex;

use crate::constants::{GIB, KIB, MIB, SIZE_UNITS};
use crate::errors::{BundleSizeError, Result};

static SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]+(?:\.[0-9]+)?)\s*(B|KB|MB|GB)$").expect("size pattern compiles")
});

/// Parse a size such as `"1KB"` or `"2.5 MB"` into bytes.
///
/// Fractional bytes are truncated; compressed sizes are whole bytes so the
/// pass/fail outcome is unchanged.
pub fn parse_size(text: &str) -> Result<u64> {
    let invalid = || BundleSizeError::InvalidSizeFormat { input: text.to_string() };

    let caps = SIZE_PATTERN.captures(text).ok_or_else(invalid)?;
    let value: f64 = caps[1].parse().map_err(|_| invalid())?;
    let unit = &caps[2];
    let multiplier = SIZE_UNITS
        .iter()
        .find(|(suffix, _)| suffix.eq_ignore_ascii_case(unit))
        .map(|(_, multiplier)| *multiplier)
        .ok_or_else(invalid)?;

    let bytes = (value * multiplier as f64) as u64;
    trace!("Parsed size '{}' as {} bytes", text, bytes);
    Ok(bytes)
}

/// Format a byte count using the largest unit in which it is at least 1.
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        return format!("{}B", bytes);
    }
    let (divisor, suffix) = if bytes < MIB {
        (KIB, "KB")
    } else if bytes < GIB {
        (MIB, "MB")
    } else {
        (GIB, "GB")
    };
    format!("{:.2}{}", bytes as f64 / divisor as f64, suffix)
}

/// Format a signed size change, e.g. `+1.50KB` or `-12B`.
pub fn format_size_delta(delta: i64) -> String {
    let sign = match delta.signum() {
        1 => "+",
        -1 => "-",
        _ => "",
    };
    format!("{}{}", sign, format_size(delta.unsigned_abs()))
}

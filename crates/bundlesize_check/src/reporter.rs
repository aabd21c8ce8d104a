use std::io::{self, Write};

use bundlesize_core::{CheckReport, Status, format_size, format_size_delta};
use colored::Colorize;
use log::{debug, trace};

/// Prints the report as the table (default) or as pretty JSON.
pub fn print_report<W: Write>(writer: &mut W, report: &CheckReport, json: bool) -> io::Result<()> {
    if json { print_json(writer, report) } else { print_table(writer, report) }
}

pub fn print_table<W: Write>(writer: &mut W, report: &CheckReport) -> io::Result<()> {
    debug!("Printing table for {} results", report.results.len());
    writeln!(writer, "\n{}\n", "Bundle Size Check Results:".bold())?;

    writeln!(writer, "{:<40} {:<12} {:<12} {:<12} Status", "File", "Raw", "Gzip", "Limit")?;
    writeln!(
        writer,
        "{} {} {} {} {}",
        "-".repeat(40),
        "-".repeat(11),
        "-".repeat(11),
        "-".repeat(11),
        "-".repeat(6)
    )?;

    for result in &report.results {
        let status = match result.status {
            Status::Pass => "✓ PASS".green(),
            Status::Fail => "✗ FAIL".red(),
        };
        writeln!(
            writer,
            "{:<40} {:<12} {:<12} {:<12} {}",
            result.path,
            format_size(result.raw_size),
            format_size(result.compressed_size),
            format_size(result.limit),
            status
        )?;
    }

    writeln!(writer)?;
    if report.all_passed {
        writeln!(writer, "{}", "✓ All files passed size checks".green())?;
    } else {
        writeln!(writer, "{}", "✗ Some files exceeded size limits".red())?;
    }

    writer.flush()?;
    Ok(())
}

pub fn print_json<W: Write>(writer: &mut W, report: &CheckReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Prints raw/gzip deltas of `path` between two runs.
///
/// Returns whether anything was printed; files missing from either report
/// and unchanged files print nothing.
pub fn print_size_diff<W: Write>(
    writer: &mut W,
    previous: &CheckReport,
    current: &CheckReport,
    path: &str,
) -> io::Result<bool> {
    let (Some(old), Some(new)) = (previous.find(path), current.find(path)) else {
        trace!("No size diff for {}: missing from a report", path);
        return Ok(false);
    };

    let raw_diff = new.raw_size as i64 - old.raw_size as i64;
    let gzip_diff = new.compressed_size as i64 - old.compressed_size as i64;
    if raw_diff == 0 && gzip_diff == 0 {
        return Ok(false);
    }

    writeln!(writer, "\n📊 Size Changes:")?;
    if raw_diff != 0 {
        writeln!(writer, "  Raw:  {}", colored_delta(raw_diff))?;
    }
    if gzip_diff != 0 {
        writeln!(writer, "  Gzip: {}", colored_delta(gzip_diff))?;
    }
    writer.flush()?;
    Ok(true)
}

fn colored_delta(delta: i64) -> colored::ColoredString {
    let text = format_size_delta(delta);
    if delta > 0 { text.red() } else { text.green() }
}

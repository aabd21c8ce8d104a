use anyhow::{Context, Result};
use bundlesize_check::{Options, WatchSession, check_files, print_report};
use bundlesize_core::{init_config, load_config};
use clap::{Parser, error::ErrorKind};
use colored::Colorize;
use log::{debug, info};
use signal_hook::consts::{SIGINT, SIGTERM};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, atomic::AtomicBool};
use std::time::Instant;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opts = match Options::try_parse() {
        Ok(opts) => opts,
        Err(e) if is_informational(&e) => e.exit(),
        Err(e) => {
            // Usage errors fail like any other error, with status 1
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };
    debug!("Parsed CLI arguments: {:?}", opts);

    match run(&opts) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// `--help` and `--version` surface as clap errors but are successful runs.
fn is_informational(e: &clap::Error) -> bool {
    matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

fn run(opts: &Options) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let config_path = opts.config.as_deref();

    if opts.init {
        let written = init_config(config_path, &cwd)?;
        println!("Created config file: {}", written.display());
        return Ok(ExitCode::SUCCESS);
    }

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    if opts.watch {
        return watch(config_path, &cwd, opts.json, &mut stdout);
    }

    let start = Instant::now();
    let config = load_config(config_path, &cwd)?;
    let report = check_files(&config, &cwd)?;
    info!("Checked {} files in {}ms", report.results.len(), start.elapsed().as_millis());

    print_report(&mut stdout, &report, opts.json)?;
    stdout.flush()?;

    // Non-zero exit to fail CI
    Ok(if report.all_passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn watch<W: Write>(
    config_path: Option<&Path>,
    cwd: &Path,
    json: bool,
    out: &mut W,
) -> Result<ExitCode> {
    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&shutdown))
            .with_context(|| format!("Failed to register handler for signal {}", signal))?;
    }

    let mut session = WatchSession::start(config_path, cwd, json, out)?;
    out.flush()?;
    session.run(&shutdown, out)?;

    writeln!(out, "\n\n{}\n", "👋 Stopping watch mode...".cyan())?;
    out.flush()?;
    session.stop();
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors_are_not_informational() {
        let err = Options::try_parse_from(["bundlesize", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert!(!is_informational(&err));
    }

    #[test]
    fn test_help_and_version_are_informational() {
        for flag in ["--help", "--version"] {
            let err = Options::try_parse_from(["bundlesize", flag]).unwrap_err();
            assert!(is_informational(&err), "{} should exit cleanly", flag);
        }
    }
}

use log::{debug, info, trace, warn};
use std::{fs, path::Path};

use bundlesize_core::{
    BundleSizeError, CheckReport, Config, FileResult, GlobPattern, Result, ScannedFile, Status,
    find_files, gzip_size, parse_size,
};

/// Runs every file group of `config` against the files under `cwd`.
///
/// Groups are processed in config order and their results kept in that order.
/// A file matched by two groups is reported twice. A group that matches
/// nothing only produces a warning.
pub fn check_files(config: &Config, cwd: &Path) -> Result<CheckReport> {
    info!("Starting bundle size check");
    debug!("Checking {} file groups under {}", config.files.len(), cwd.display());

    let mut results: Vec<FileResult> = Vec::new();
    for group in &config.files {
        let limit = parse_size(&group.max_size)?;
        let pattern = GlobPattern::new(&group.path);
        trace!("Group '{}' limited to {} bytes", group.path, limit);

        let files = find_files(cwd, cwd, &pattern);
        if files.is_empty() {
            warn!("No files found for pattern \"{}\"", group.path);
            continue;
        }

        for file in &files {
            results.push(evaluate_file(file, limit)?);
        }
    }

    let report = CheckReport::new(results);
    info!(
        "Bundle size check complete. {} files checked, passed: {}",
        report.results.len(),
        report.all_passed
    );
    Ok(report)
}

fn evaluate_file(file: &ScannedFile, limit: u64) -> Result<FileResult> {
    let raw_size =
        fs::metadata(&file.path).map_err(|e| BundleSizeError::from_fs(&file.path, e))?.len();
    let compressed_size = gzip_size(&file.path)?;
    let status = Status::evaluate(compressed_size, limit);
    debug!(
        "{}: raw={} gzip={} limit={} -> {:?}",
        file.relative, raw_size, compressed_size, limit, status
    );

    Ok(FileResult { path: file.relative.clone(), raw_size, compressed_size, limit, status })
}

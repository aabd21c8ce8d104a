use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::{Component, Path, PathBuf};

use crate::glob::GlobPattern;

/// A file found under the scan base that matched the group pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Full path, usable for reading the file
    pub path: PathBuf,
    /// Path relative to the working directory, `/`-separated
    pub relative: String,
}

/// Walks `base` and returns the files whose path relative to `cwd` matches `pattern`.
///
/// The walk is best-effort: unreadable directories, broken links and symlink
/// loops are skipped. Results are sorted by relative path.
pub fn find_files(base: &Path, cwd: &Path, pattern: &GlobPattern) -> Vec<ScannedFile> {
    debug!("Scanning {} for '{}'", base.display(), pattern.as_str());
    let mut results = Vec::new();
    // Build output is usually gitignored, so no ignore-file filtering
    let walker = WalkBuilder::new(base).standard_filters(false).follow_links(true).build();

    for res in walker {
        let dent = match res {
            Ok(dent) => dent,
            Err(e) => {
                debug!("Skipping entry: {}", e);
                continue;
            }
        };
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = dent.into_path();
        let relative = relative_display(&path, cwd);
        if pattern.is_match(&relative) {
            trace!("Matched '{}' with '{}'", relative, pattern.as_str());
            results.push(ScannedFile { path, relative });
        }
    }

    results.sort_by(|a, b| a.relative.cmp(&b.relative));
    debug!("Found {} files for '{}'", results.len(), pattern.as_str());
    results
}

/// Relative path from `cwd` to `path` with `/` separators.
///
/// Falls back to the full path when `path` is not under `cwd`.
pub fn relative_display(path: &Path, cwd: &Path) -> String {
    let rel = path.strip_prefix(cwd).unwrap_or(path);
    let mut parts: Vec<String> = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(p) => parts.push(p.to_string_lossy().into_owned()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => {
                return rel.to_string_lossy().replace('\\', "/");
            }
        }
    }
    parts.join("/")
}

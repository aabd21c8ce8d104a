//! Watch mode: re-run the check whenever a watched bundle changes.
//!
//! A [`WatchSession`] owns everything that lives for the duration of watch
//! mode: the resolved list of files, the OS watch handles, the previous
//! report (for size diffs) and the [`ChangeDebouncer`]. Events are handled
//! one at a time on the calling thread.

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use log::{debug, error, info, trace, warn};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::{
    collections::{BTreeSet, HashMap},
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError},
    },
    time::{Duration, SystemTime},
};

use bundlesize_core::{
    BundleSizeError, CheckReport, Config, DEBOUNCE_WINDOW, GlobPattern, ScannedFile,
    WATCH_POLL_INTERVAL, find_files, load_config,
};

use crate::{
    checker::check_files,
    reporter::{print_report, print_size_diff},
};

/// Remembers the last modification time seen per file and drops events that
/// land inside the debounce window.
#[derive(Debug)]
pub struct ChangeDebouncer {
    window: Duration,
    last_seen: HashMap<PathBuf, SystemTime>,
}

impl ChangeDebouncer {
    pub fn new(window: Duration) -> Self {
        ChangeDebouncer { window, last_seen: HashMap::new() }
    }

    /// Sets the baseline for `path`; an unknown time counts as the epoch.
    pub fn record(&mut self, path: &Path, modified: Option<SystemTime>) {
        self.last_seen.insert(path.to_path_buf(), modified.unwrap_or(SystemTime::UNIX_EPOCH));
    }

    /// Whether a change stamped `modified` should trigger a re-check.
    ///
    /// Accepted changes become the new baseline. Times earlier than the
    /// baseline are ignored.
    pub fn should_fire(&mut self, path: &Path, modified: SystemTime) -> bool {
        let last = self.last_seen.get(path).copied().unwrap_or(SystemTime::UNIX_EPOCH);
        match modified.duration_since(last) {
            Ok(elapsed) if elapsed >= self.window => {
                self.last_seen.insert(path.to_path_buf(), modified);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}

pub struct WatchSession {
    cwd: PathBuf,
    config_path: Option<PathBuf>,
    json: bool,
    files: Vec<ScannedFile>,
    /// Watched paths, both as scanned and canonicalized, to index into `files`
    lookup: HashMap<PathBuf, usize>,
    debouncer: ChangeDebouncer,
    last_report: CheckReport,
    watcher: RecommendedWatcher,
    watched_dirs: Vec<PathBuf>,
    events: Receiver<notify::Result<Event>>,
}

impl WatchSession {
    /// Resolves the files to watch, prints the initial report and registers
    /// the OS watches.
    pub fn start<W: Write>(
        config_path: Option<&Path>,
        cwd: &Path,
        json: bool,
        out: &mut W,
    ) -> Result<Self> {
        info!("Starting watch mode");
        let config = load_config(config_path, cwd)?;

        let files = resolve_watch_targets(&config, cwd);
        if files.is_empty() {
            return Err(BundleSizeError::WatchSetupFailure {
                path: cwd.to_path_buf(),
                details: "no files match the configured patterns".to_string(),
            }
            .into());
        }

        writeln!(out, "{}\n", "👀 Watching for changes...".cyan())?;
        writeln!(out, "Files being watched:")?;
        for file in &files {
            writeln!(out, "  - {}", file.path.display())?;
        }
        writeln!(out, "\nPress Ctrl+C to stop\n")?;

        let last_report = check_files(&config, cwd)?;
        print_report(out, &last_report, json)?;

        let mut debouncer = ChangeDebouncer::new(DEBOUNCE_WINDOW);
        let mut lookup = HashMap::new();
        for (idx, file) in files.iter().enumerate() {
            debouncer.record(&file.path, modified_time(&file.path).ok());
            lookup.insert(file.path.clone(), idx);
            if let Ok(canonical) = fs::canonicalize(&file.path) {
                lookup.insert(canonical, idx);
            }
        }

        let (tx, events) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(tx, notify::Config::default()).map_err(|e| {
            BundleSizeError::WatchSetupFailure { path: cwd.to_path_buf(), details: e.to_string() }
        })?;

        // Watch parent directories so editors that save via rename are still seen
        let watched_dirs: Vec<PathBuf> = files
            .iter()
            .filter_map(|f| f.path.parent().map(Path::to_path_buf))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        for dir in &watched_dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive).map_err(|e| {
                BundleSizeError::WatchSetupFailure { path: dir.clone(), details: e.to_string() }
            })?;
            debug!("Watching directory {}", dir.display());
        }
        info!("Watching {} files in {} directories", files.len(), watched_dirs.len());

        Ok(WatchSession {
            cwd: cwd.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            json,
            files,
            lookup,
            debouncer,
            last_report,
            watcher,
            watched_dirs,
            events,
        })
    }

    pub fn files(&self) -> &[ScannedFile] {
        &self.files
    }

    pub fn last_report(&self) -> &CheckReport {
        &self.last_report
    }

    /// Handles change events until `shutdown` is set or the event source closes.
    pub fn run<W: Write>(&mut self, shutdown: &AtomicBool, out: &mut W) -> Result<()> {
        while !shutdown.load(Ordering::Relaxed) {
            match self.events.recv_timeout(WATCH_POLL_INTERVAL) {
                Ok(Ok(event)) => self.handle_event(&event, out),
                Ok(Err(e)) => error!("Watch error: {}", e),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("File watcher disconnected, stopping watch mode");
                    break;
                }
            }
        }
        debug!("Watch loop finished");
        Ok(())
    }

    fn handle_event<W: Write>(&mut self, event: &Event, out: &mut W) {
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            trace!("Ignoring event {:?}", event.kind);
            return;
        }

        for path in &event.paths {
            let idx = self
                .lookup
                .get(path)
                .or_else(|| fs::canonicalize(path).ok().and_then(|c| self.lookup.get(&c)));
            let Some(file) = idx.map(|&i| self.files[i].clone()) else {
                continue;
            };
            if let Err(e) = self.on_change(&file, out) {
                error!("Error checking {}: {:#}", file.path.display(), e);
            }
        }
    }

    /// Re-checks after `file` changed. Returns whether a check ran.
    pub fn on_change<W: Write>(&mut self, file: &ScannedFile, out: &mut W) -> Result<bool> {
        let modified = modified_time(&file.path)?;
        if !self.debouncer.should_fire(&file.path, modified) {
            trace!("Debounced change to {}", file.relative);
            return Ok(false);
        }

        let name = file.path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        writeln!(out, "\n{}", format!("📝 Change detected: {}", name).yellow())?;
        writeln!(out, "{}\n", Local::now().format("%H:%M:%S").to_string().dimmed())?;

        let config = load_config(self.config_path.as_deref(), &self.cwd)?;
        let report = check_files(&config, &self.cwd)?;
        print_report(out, &report, self.json)?;
        print_size_diff(out, &self.last_report, &report, &file.relative)?;
        self.last_report = report;

        writeln!(out, "\n{}\n", "👀 Watching for changes...".cyan())?;
        out.flush()?;
        Ok(true)
    }

    /// Releases every OS watch. Returns how many directories were unwatched.
    pub fn stop(mut self) -> usize {
        let mut released = 0;
        for dir in &self.watched_dirs {
            match self.watcher.unwatch(dir) {
                Ok(()) => released += 1,
                Err(e) => warn!("Failed to unwatch {}: {}", dir.display(), e),
            }
        }
        self.debouncer.clear();
        info!("Stopped watching {} directories", released);
        released
    }
}

/// The concrete files the configured patterns match right now, without duplicates.
pub fn resolve_watch_targets(config: &Config, cwd: &Path) -> Vec<ScannedFile> {
    let mut seen = BTreeSet::new();
    let mut targets = Vec::new();
    for group in &config.files {
        for file in find_files(cwd, cwd, &GlobPattern::new(&group.path)) {
            if seen.insert(file.path.clone()) {
                targets.push(file);
            }
        }
    }
    targets
}

fn modified_time(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to read modification time of {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{FileTime, set_file_mtime};
    use notify::event::{DataChange, ModifyKind, RemoveKind};
    use tempfile::TempDir;

    const CONFIG: &str = r#"{"files": [
        {"path": "dist/*.js", "maxSize": "1KB"},
        {"path": "dist/app.js", "maxSize": "10KB"}
    ]}"#;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn project() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, ".bundlesizerc.json", CONFIG);
        create_test_file(root, "dist/app.js", "console.log('app');\n");
        create_test_file(root, "dist/vendor.js", "console.log('vendor');\n");
        temp_dir
    }

    fn bump_mtime(path: &Path, by: Duration) {
        let current = fs::metadata(path).unwrap().modified().unwrap();
        set_file_mtime(path, FileTime::from_system_time(current + by)).unwrap();
    }

    #[test]
    fn test_debouncer_ignores_changes_inside_window() {
        let path = Path::new("dist/app.js");
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let mut debouncer = ChangeDebouncer::new(Duration::from_millis(100));
        debouncer.record(path, Some(base));

        assert!(!debouncer.should_fire(path, base));
        assert!(!debouncer.should_fire(path, base + Duration::from_millis(99)));
        assert!(debouncer.should_fire(path, base + Duration::from_millis(100)));
        // the accepted change is the new baseline
        assert!(!debouncer.should_fire(path, base + Duration::from_millis(150)));
        assert!(debouncer.should_fire(path, base + Duration::from_millis(250)));
    }

    #[test]
    fn test_debouncer_ignores_time_going_backwards() {
        let path = Path::new("dist/app.js");
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let mut debouncer = ChangeDebouncer::new(Duration::from_millis(100));
        debouncer.record(path, Some(base));

        assert!(!debouncer.should_fire(path, base - Duration::from_secs(5)));
    }

    #[test]
    fn test_debouncer_unknown_baseline_is_epoch() {
        let mut debouncer = ChangeDebouncer::new(Duration::from_millis(100));
        debouncer.record(Path::new("a.js"), None);
        assert!(debouncer.should_fire(Path::new("a.js"), SystemTime::now()));
        assert!(debouncer.should_fire(Path::new("never-recorded.js"), SystemTime::now()));
    }

    #[test]
    fn test_debouncer_clear_forgets_baselines() {
        let path = Path::new("dist/app.js");
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let mut debouncer = ChangeDebouncer::new(Duration::from_millis(100));
        debouncer.record(path, Some(base));
        assert!(!debouncer.should_fire(path, base));

        debouncer.clear();
        assert!(debouncer.should_fire(path, base));
    }

    #[test]
    fn test_resolve_watch_targets_deduplicates() {
        let temp_dir = project();
        let config = load_config(None, temp_dir.path()).unwrap();

        let targets = resolve_watch_targets(&config, temp_dir.path());
        let relatives: Vec<&str> = targets.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(relatives, vec!["dist/app.js", "dist/vendor.js"]);
    }

    #[test]
    fn test_start_fails_without_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), ".bundlesizerc.json", CONFIG);

        let mut out = Vec::new();
        let err = WatchSession::start(None, temp_dir.path(), false, &mut out).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<BundleSizeError>(),
            Some(BundleSizeError::WatchSetupFailure { .. })
        ));
    }

    #[test]
    fn test_start_fails_without_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let err = WatchSession::start(None, temp_dir.path(), false, &mut out).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<BundleSizeError>(),
            Some(BundleSizeError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_session_lifecycle() {
        let temp_dir = project();
        let root = temp_dir.path();

        let mut out = Vec::new();
        let mut session = WatchSession::start(None, root, false, &mut out).unwrap();
        let initial = String::from_utf8(out).unwrap();
        assert!(initial.contains("Files being watched:"));
        assert!(initial.contains("Bundle Size Check Results:"));
        assert_eq!(session.files().len(), 2);
        assert_eq!(session.last_report().results.len(), 3);

        let app = session.files()[0].clone();
        assert_eq!(app.relative, "dist/app.js");

        // same mtime as the baseline: debounced
        let mut out = Vec::new();
        assert!(!session.on_change(&app, &mut out).unwrap());
        assert!(out.is_empty());

        fs::write(&app.path, "console.log('app');\n".repeat(40)).unwrap();
        bump_mtime(&app.path, Duration::from_secs(5));
        let mut out = Vec::new();
        assert!(session.on_change(&app, &mut out).unwrap());
        let rerun = String::from_utf8(out).unwrap();
        assert!(rerun.contains("Change detected: app.js"));
        assert!(rerun.contains("Size Changes:"));
        assert!(rerun.contains("Raw:"));
        assert_eq!(session.last_report().find("dist/app.js").unwrap().raw_size, 800);

        let shutdown = AtomicBool::new(true);
        session.run(&shutdown, &mut Vec::new()).unwrap();
        assert_eq!(session.stop(), 1);
    }

    #[test]
    fn test_events_dispatch_only_watched_changes() {
        let temp_dir = project();
        let root = temp_dir.path();
        let other = create_test_file(root, "dist/other.txt", "notes");

        let mut out = Vec::new();
        let mut session = WatchSession::start(None, root, false, &mut out).unwrap();
        let app = session.files()[0].path.clone();
        bump_mtime(&app, Duration::from_secs(5));

        let modified = EventKind::Modify(ModifyKind::Data(DataChange::Content));
        let mut out = Vec::new();
        session.handle_event(&Event::new(modified).add_path(other), &mut out);
        assert!(out.is_empty());

        let removed = EventKind::Remove(RemoveKind::File);
        session.handle_event(&Event::new(removed).add_path(app.clone()), &mut out);
        assert!(out.is_empty());

        session.handle_event(&Event::new(modified).add_path(app), &mut out);
        let rerun = String::from_utf8(out).unwrap();
        assert!(rerun.contains("Change detected: app.js"));
        session.stop();
    }

    #[cfg(unix)]
    #[test]
    fn test_events_match_through_symlinked_paths() {
        let temp_dir = project();
        let root = temp_dir.path();
        let alias = TempDir::new().unwrap();
        let linked = alias.path().join("project");
        std::os::unix::fs::symlink(root, &linked).unwrap();

        let mut out = Vec::new();
        let mut session = WatchSession::start(None, root, false, &mut out).unwrap();
        bump_mtime(&root.join("dist/app.js"), Duration::from_secs(5));

        let modified = EventKind::Modify(ModifyKind::Data(DataChange::Content));
        let mut out = Vec::new();
        session.handle_event(&Event::new(modified).add_path(linked.join("dist/app.js")), &mut out);
        assert!(String::from_utf8(out).unwrap().contains("Change detected: app.js"));
        session.stop();
    }

    #[test]
    fn test_json_session_prints_json() {
        let temp_dir = project();

        let mut out = Vec::new();
        let session = WatchSession::start(None, temp_dir.path(), true, &mut out).unwrap();
        let initial = String::from_utf8(out).unwrap();
        assert!(initial.contains("\"passed\": true"));
        assert!(initial.contains("\"gzipSize\""));
        session.stop();
    }

    #[test]
    fn test_failed_recheck_keeps_session_usable() {
        let temp_dir = project();
        let root = temp_dir.path();

        let mut out = Vec::new();
        let mut session = WatchSession::start(None, root, false, &mut out).unwrap();
        let app = session.files()[0].clone();

        fs::write(root.join(".bundlesizerc.json"), r#"{"files": "broken"}"#).unwrap();
        bump_mtime(&app.path, Duration::from_secs(5));
        assert!(session.on_change(&app, &mut Vec::new()).is_err());

        fs::write(root.join(".bundlesizerc.json"), CONFIG).unwrap();
        bump_mtime(&app.path, Duration::from_secs(5));
        assert!(session.on_change(&app, &mut Vec::new()).unwrap());
        session.stop();
    }
}

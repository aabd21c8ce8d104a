use log::{debug, info, trace, warn};
use path_clean::clean;
use serde_json::Value;
use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::constants::DEFAULT_CONFIG_PATH;
use crate::errors::{BundleSizeError, Result};
use crate::types::{Config, FileGroup};

/// Absolute, normalized location of the config file.
pub fn resolve_config_path(path: Option<&Path>, cwd: &Path) -> PathBuf {
    let requested = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
    clean(cwd.join(requested))
}

pub fn load_config(path: Option<&Path>, cwd: &Path) -> Result<Config> {
    let full_path = resolve_config_path(path, cwd);
    debug!("Loading config from {}", full_path.display());

    let content = match fs::read_to_string(&full_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let requested = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
            return Err(BundleSizeError::ConfigNotFound { path: requested.to_path_buf() });
        }
        Err(e) => return Err(BundleSizeError::from_fs(&full_path, e)),
    };

    let config = parse_config(&content, &full_path)?;
    debug!("Loaded {} file groups", config.files.len());
    Ok(config)
}

/// Validates the shape of a config document and converts it.
///
/// Size strings are kept verbatim; they are parsed when the check runs.
pub fn parse_config(content: &str, origin: &Path) -> Result<Config> {
    let json: Value = serde_json::from_str(content).map_err(|e| BundleSizeError::ConfigParse {
        path: origin.to_path_buf(),
        details: e.to_string(),
    })?;

    let entries = json
        .as_object()
        .ok_or_else(|| BundleSizeError::invalid_shape("config must be a JSON object"))?
        .get("files")
        .and_then(Value::as_array)
        .ok_or_else(|| BundleSizeError::invalid_shape("\"files\" must be an array"))?;

    if entries.is_empty() {
        return Err(BundleSizeError::invalid_shape("\"files\" must list at least one file group"));
    }

    let mut files = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let path = string_field(entry, idx, "path")?;
        if path.is_empty() {
            return Err(BundleSizeError::invalid_shape(format!(
                "files[{}].path must not be empty",
                idx
            )));
        }
        let max_size = string_field(entry, idx, "maxSize")?;
        trace!("File group {}: '{}' <= {}", idx, path, max_size);
        files.push(FileGroup { path, max_size });
    }

    Ok(Config { files })
}

fn string_field(entry: &Value, idx: usize, field: &str) -> Result<String> {
    entry.get(field).and_then(Value::as_str).map(str::to_string).ok_or_else(|| {
        BundleSizeError::invalid_shape(format!("files[{}].{} must be a string", idx, field))
    })
}

/// Writes the default config, refusing to touch an existing file.
pub fn init_config(path: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    let full_path = resolve_config_path(path, cwd);
    let requested = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
    debug!("Initializing config at {}", full_path.display());

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&full_path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(BundleSizeError::ConfigAlreadyExists { path: requested.to_path_buf() });
        }
        Err(e) => return Err(BundleSizeError::from_fs(&full_path, e)),
    };

    let mut content = serde_json::to_string_pretty(&Config::default())
        .map_err(|e| BundleSizeError::io(&full_path, e.into()))?;
    content.push('\n');
    write_or_discard(&mut file, &full_path, content.as_bytes())?;
    info!("Created config file: {}", full_path.display());
    Ok(full_path)
}

/// Writes `content`, removing the freshly created file at `path` if the write fails.
fn write_or_discard<W: Write>(writer: &mut W, path: &Path, content: &[u8]) -> Result<()> {
    if let Err(e) = writer.write_all(content).and_then(|()| writer.flush()) {
        if let Err(remove_err) = fs::remove_file(path) {
            warn!("Failed to remove partial config {}: {}", path.display(), remove_err);
        }
        return Err(BundleSizeError::io(path, e));
    }
    Ok(())
}

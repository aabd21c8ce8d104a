use flate2::{Compression, write::GzEncoder};
use log::trace;
use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use crate::errors::{BundleSizeError, Result};

/// Gzip size of the file at `path`, compressed at the default level.
pub fn gzip_size(path: &Path) -> Result<u64> {
    let content = fs::read(path).map_err(|e| BundleSizeError::from_fs(path, e))?;
    let size = gzip_len(&content).map_err(|e| BundleSizeError::io(path, e))?;
    trace!("{}: {} bytes raw, {} bytes gzip", path.display(), content.len(), size);
    Ok(size)
}

/// Length of `bytes` once gzipped, header and trailer included.
pub fn gzip_len(bytes: &[u8]) -> io::Result<u64> {
    let mut encoder =
        GzEncoder::new(Vec::with_capacity(bytes.len() / 2 + 64), Compression::default());
    encoder.write_all(bytes)?;
    let compressed = encoder.finish()?;
    Ok(compressed.len() as u64)
}

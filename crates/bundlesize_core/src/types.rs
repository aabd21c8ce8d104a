use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FILE_GROUPS;

/// One glob pattern and the largest gzip size its files may have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileGroup {
    pub path: String,
    #[serde(rename = "maxSize")]
    pub max_size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub files: Vec<FileGroup>,
}

impl Default for Config {
    fn default() -> Self {
        let files = DEFAULT_FILE_GROUPS
            .iter()
            .map(|(path, max_size)| FileGroup {
                path: path.to_string(),
                max_size: max_size.to_string(),
            })
            .collect();
        Config { files }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    /// Inclusive boundary: a file exactly at its limit passes.
    pub fn evaluate(compressed_size: u64, limit: u64) -> Self {
        if compressed_size <= limit { Status::Pass } else { Status::Fail }
    }

    pub fn is_pass(self) -> bool {
        self == Status::Pass
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResult {
    /// Path relative to the working directory the check ran in
    pub path: String,
    #[serde(rename = "size")]
    pub raw_size: u64,
    #[serde(rename = "gzipSize")]
    pub compressed_size: u64,
    #[serde(rename = "maxSize")]
    pub limit: u64,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    #[serde(rename = "files")]
    pub results: Vec<FileResult>,
    #[serde(rename = "passed")]
    pub all_passed: bool,
}

impl CheckReport {
    pub fn new(results: Vec<FileResult>) -> Self {
        let all_passed = results.iter().all(|r| r.status.is_pass());
        CheckReport { results, all_passed }
    }

    /// First result recorded for `path`; later duplicates from overlapping groups are ignored.
    pub fn find(&self, path: &str) -> Option<&FileResult> {
        self.results.iter().find(|r| r.path == path)
    }
}

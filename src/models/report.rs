use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Represents a file found under a bundle root
#[derive(Debug, Clone)]
pub struct BundleFile {
    /// Relative path from the scan root (preserves hierarchy)
    pub relative_path: String,
    /// Absolute location on disk
    pub disk_path: PathBuf,
}

impl BundleFile {
    pub fn new(relative_path: String, disk_path: PathBuf) -> Self {
        Self {
            relative_path,
            disk_path,
        }
    }
}

/// One entry record listed from an archive
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    /// Relative path of the entry inside the archive
    pub name: String,
    /// Uncompressed size in bytes
    pub size: u64,
    /// Compressed size in bytes
    pub compressed_size: u64,
    pub is_dir: bool,
}

/// Summary of a completed create operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackReport {
    pub archive_path: String,
    pub entry_count: usize,
    /// Total uncompressed bytes fed into the archive
    pub total_bytes: u64,
}

/// Summary of a completed extract operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractReport {
    pub destination: String,
    /// Entries recorded in the archive
    pub entry_count: usize,
    /// Files actually written to disk
    pub written: usize,
    /// Entries skipped (existing files under SkipExisting, or unsafe names)
    pub skipped: usize,
}

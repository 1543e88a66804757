//! String-channel packaging commands.
//!
//! Automated callers (agent tool-calling frameworks, scripted pipelines)
//! inspect text rather than handling typed errors, so these functions take
//! plain path strings and fold every outcome into one returned status
//! `String`: success messages start with `Successfully`, failures with
//! `Error:` followed by the kind-specific description. Nothing here panics
//! and no fault escapes. The typed API in [`crate::core::archive`] is the
//! configurable surface; these wrappers run with default options.

use std::path::Path;

use crate::core::archive::ArchivePackager;
use crate::models::{ExtractConfig, PackConfig};

/// Package a file or directory tree into a zip archive.
///
/// # Arguments
/// * `source_path` - Existing regular file or directory
/// * `output_archive_path` - Where to write the archive (parent must exist)
pub fn create_archive(source_path: &str, output_archive_path: &str) -> String {
    let packager = ArchivePackager::new();
    match packager.create(
        Path::new(source_path),
        Path::new(output_archive_path),
        &PackConfig::default(),
    ) {
        Ok(report) => format!(
            "Successfully created archive '{}' from '{}' ({} entries, {} bytes)",
            output_archive_path, source_path, report.entry_count, report.total_bytes
        ),
        Err(e) => format!("Error: {}", e),
    }
}

/// Expand a zip archive into a destination directory.
///
/// # Arguments
/// * `archive_path` - Existing archive file
/// * `destination_dir` - Target directory, created (with parents) if absent
pub fn extract_archive(archive_path: &str, destination_dir: &str) -> String {
    let packager = ArchivePackager::new();
    match packager.extract(
        Path::new(archive_path),
        Path::new(destination_dir),
        &ExtractConfig::default(),
    ) {
        Ok(report) => format!(
            "Successfully extracted archive '{}' to '{}' ({} files written)",
            archive_path, destination_dir, report.written
        ),
        Err(e) => format!("Error: {}", e),
    }
}

/// List an archive's entries as a JSON array.
pub fn list_archive(archive_path: &str) -> String {
    let packager = ArchivePackager::new();
    match packager.list(Path::new(archive_path)) {
        Ok(entries) => serde_json::to_string(&entries)
            .unwrap_or_else(|e| format!("Error: failed to serialize entry list: {}", e)),
        Err(e) => format!("Error: {}", e),
    }
}

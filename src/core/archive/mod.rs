// Archive packaging modules
pub mod common;
pub mod zip_format;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::{
    ArchiveEntry, ExtractConfig, ExtractReport, PackConfig, PackReport, SitePackError,
};
use common::ArchiveFormat;
use zip_format::ZipFormat;

/// Archive packager front
///
/// Dispatches to the container format that recognizes a given path and
/// exposes the three packaging operations:
/// 1. Create an archive from a file or directory tree
/// 2. Extract an archive into a destination directory
/// 3. List an archive's entries without extracting
pub struct ArchivePackager {
    formats: Vec<Arc<dyn ArchiveFormat>>,
    /// Container used when an output path's extension matches no format;
    /// the packager always produces zip containers, the file name is just
    /// naming
    default_format: Arc<dyn ArchiveFormat>,
}

impl ArchivePackager {
    /// Create a packager with all supported container formats
    pub fn new() -> Self {
        let zip: Arc<dyn ArchiveFormat> = Arc::new(ZipFormat::new());
        Self {
            formats: vec![Arc::clone(&zip)],
            default_format: zip,
        }
    }

    /// Find the format that recognizes an existing archive
    fn format_for(&self, archive_path: &Path) -> Result<Arc<dyn ArchiveFormat>, SitePackError> {
        for format in &self.formats {
            if format.supports(archive_path) {
                return Ok(Arc::clone(format));
            }
        }

        let ext = archive_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown");

        Err(SitePackError::UnsupportedArchive(format!(".{}", ext)))
    }

    /// Create an archive from a source file or directory
    ///
    /// # Arguments
    /// * `source_path` - Regular file or directory to package
    /// * `output_path` - Path for the output archive
    /// * `config` - Creation options, validated before any filesystem work
    ///
    /// # Returns
    /// * Summary of the written archive
    pub fn create(
        &self,
        source_path: &Path,
        output_path: &Path,
        config: &PackConfig,
    ) -> Result<PackReport, SitePackError> {
        config.validate()?;

        let format = self
            .formats
            .iter()
            .find(|f| f.supports(output_path))
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default_format));

        format.create(source_path, output_path, config)
    }

    /// Extract an archive into a destination directory
    ///
    /// # Arguments
    /// * `archive_path` - Path to the archive file
    /// * `dest_dir` - Destination directory, created if absent
    /// * `config` - Extraction options (conflict policy)
    pub fn extract(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
        config: &ExtractConfig,
    ) -> Result<ExtractReport, SitePackError> {
        if !archive_path.is_file() {
            return Err(SitePackError::ArchiveNotFound(
                archive_path.display().to_string(),
            ));
        }

        let format = self.format_for(archive_path)?;
        format.extract(archive_path, dest_dir, config)
    }

    /// List the entries recorded in an archive
    pub fn list(&self, archive_path: &Path) -> Result<Vec<ArchiveEntry>, SitePackError> {
        if !archive_path.is_file() {
            return Err(SitePackError::ArchiveNotFound(
                archive_path.display().to_string(),
            ));
        }

        let format = self.format_for(archive_path)?;
        format.list(archive_path)
    }

    /// Default bundle name for a source: `<name>_package.zip` next to it
    ///
    /// # Example
    /// ```ignore
    /// "autosite" -> "autosite_package.zip"
    /// "/work/autosite" -> "/work/autosite_package.zip"
    /// ```
    pub fn default_bundle_name(source_path: &Path) -> PathBuf {
        let parent = source_path.parent();
        let stem = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("site");

        let new_name = format!("{}_package.zip", stem);

        match parent {
            Some(p) => p.join(new_name),
            None => PathBuf::from(new_name),
        }
    }

    /// Check if a path is recognized by any container format
    pub fn is_supported(&self, path: &Path) -> bool {
        self.formats.iter().any(|f| f.supports(path))
    }

    /// Archive extensions the packager recognizes by name
    pub fn supported_extensions() -> Vec<&'static str> {
        vec!["zip"]
    }
}

impl Default for ArchivePackager {
    fn default() -> Self {
        Self::new()
    }
}

// Capability trait for archive container formats

use std::path::Path;

use crate::models::{ArchiveEntry, ExtractConfig, ExtractReport, PackConfig, PackReport, SitePackError};

/// Trait for handling one archive container format
pub trait ArchiveFormat: Send + Sync {
    /// Extract an archive into a directory, preserving hierarchy
    fn extract(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
        config: &ExtractConfig,
    ) -> Result<ExtractReport, SitePackError>;

    /// Create an archive from a file or directory
    fn create(
        &self,
        source_path: &Path,
        output_path: &Path,
        config: &PackConfig,
    ) -> Result<PackReport, SitePackError>;

    /// List the entries recorded in an archive without extracting
    fn list(&self, archive_path: &Path) -> Result<Vec<ArchiveEntry>, SitePackError>;

    /// Check if this format recognizes the given file
    fn supports(&self, archive_path: &Path) -> bool;
}

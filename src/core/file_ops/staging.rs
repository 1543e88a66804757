use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::models::SitePackError;

/// Temporary workspace for one bundle-assembly or upload-inspection cycle
///
/// Creates a disk-based scratch area with two subdirectories:
/// - `uploads/` - A received archive is expanded here before anything
///   downstream inspects it
/// - `site/` - Generated output accumulates here before packaging
///
/// Automatically cleaned up when dropped.
pub struct SiteWorkspace {
    temp_dir: TempDir,
    uploads_path: PathBuf,
    site_path: PathBuf,
}

impl SiteWorkspace {
    /// Create a new workspace
    ///
    /// # Arguments
    /// * `label` - Short name for the run (used in the directory prefix)
    pub fn new(label: &str) -> Result<Self, SitePackError> {
        let temp_dir = tempfile::Builder::new()
            .prefix(&format!("sitepack_{}_", label))
            .tempdir()
            .map_err(|e| {
                SitePackError::Archive(format!("Failed to create temporary workspace: {}", e))
            })?;

        let base_path = temp_dir.path();
        let uploads_path = base_path.join("uploads");
        let site_path = base_path.join("site");

        fs::create_dir_all(&uploads_path).map_err(|e| {
            SitePackError::Archive(format!("Failed to create uploads directory: {}", e))
        })?;

        fs::create_dir_all(&site_path).map_err(|e| {
            SitePackError::Archive(format!("Failed to create site directory: {}", e))
        })?;

        Ok(Self {
            temp_dir,
            uploads_path,
            site_path,
        })
    }

    /// Directory where received archives are expanded
    pub fn uploads_path(&self) -> &Path {
        &self.uploads_path
    }

    /// Directory where generated site files accumulate
    pub fn site_path(&self) -> &Path {
        &self.site_path
    }

    /// Base workspace directory
    pub fn base_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write content to a file under `site/`, creating parent directories
    ///
    /// # Arguments
    /// * `relative_path` - Path relative to the site directory
    /// * `content` - File content to write
    pub fn write_site_file(
        &self,
        relative_path: &Path,
        content: &[u8],
    ) -> Result<PathBuf, SitePackError> {
        let dest_full = self.site_path.join(relative_path);

        if let Some(parent) = dest_full.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SitePackError::Archive(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(&dest_full, content).map_err(|e| {
            SitePackError::Archive(format!("Failed to write to {}: {}", dest_full.display(), e))
        })?;

        Ok(dest_full)
    }

    /// Copy an external file into `uploads/` under the given name
    pub fn import_upload(&self, source: &Path, name: &str) -> Result<PathBuf, SitePackError> {
        let dest_full = self.uploads_path.join(name);

        fs::copy(source, &dest_full).map_err(|e| {
            SitePackError::Archive(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                dest_full.display(),
                e
            ))
        })?;

        Ok(dest_full)
    }

    /// Total size of all files under `uploads/` (in bytes)
    pub fn uploads_size(&self) -> Result<u64, SitePackError> {
        self.dir_size(&self.uploads_path)
    }

    /// Total size of all files under `site/` (in bytes)
    pub fn site_size(&self) -> Result<u64, SitePackError> {
        self.dir_size(&self.site_path)
    }

    /// Calculate total size of all files in a directory recursively
    fn dir_size(&self, path: &Path) -> Result<u64, SitePackError> {
        let mut total_size = 0u64;

        if path.is_dir() {
            let entries = fs::read_dir(path).map_err(|e| {
                SitePackError::Archive(format!(
                    "Failed to read directory {}: {}",
                    path.display(),
                    e
                ))
            })?;

            for entry in entries {
                let entry = entry.map_err(|e| {
                    SitePackError::Archive(format!("Failed to read directory entry: {}", e))
                })?;

                let metadata = entry.metadata().map_err(|e| {
                    SitePackError::Archive(format!("Failed to get metadata: {}", e))
                })?;

                if metadata.is_dir() {
                    total_size += self.dir_size(&entry.path())?;
                } else {
                    total_size += metadata.len();
                }
            }
        }

        Ok(total_size)
    }
}

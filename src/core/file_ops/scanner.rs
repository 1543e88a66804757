use std::path::Path;
use walkdir::WalkDir;

use crate::models::BundleFile;

/// Recursive file scanner for bundle roots
///
/// Walks a directory tree and collects every regular file, keeping relative
/// paths so the directory hierarchy can be preserved downstream. An optional
/// extension filter narrows the result to one file family.
pub struct BundleScanner {
    extensions: Option<Vec<&'static str>>,
}

impl BundleScanner {
    /// Create a scanner that collects every regular file
    pub fn new() -> Self {
        Self { extensions: None }
    }

    /// Create a scanner restricted to the given extensions (case-insensitive)
    pub fn with_extensions(extensions: Vec<&'static str>) -> Self {
        Self {
            extensions: Some(extensions),
        }
    }

    /// Scan a directory recursively for files
    ///
    /// # Arguments
    /// * `root_path` - Root directory to scan
    ///
    /// # Returns
    /// * Vector of `BundleFile` sorted by relative path, so archive entry
    ///   order is deterministic
    pub fn scan(&self, root_path: &Path) -> Result<Vec<BundleFile>, std::io::Error> {
        let mut files = Vec::new();

        // Walk directory tree; directory entries themselves are not collected
        for entry in WalkDir::new(root_path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if !self.is_included(path) {
                continue;
            }

            let relative_path = path
                .strip_prefix(root_path)
                .map_err(|e| {
                    std::io::Error::new(
                        std::io::ErrorKind::Other,
                        format!("Failed to calculate relative path: {}", e),
                    )
                })?
                .to_path_buf();

            files.push(BundleFile::new(
                relative_path.to_string_lossy().to_string(),
                path.to_path_buf(),
            ));
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        Ok(files)
    }

    /// Scan for files carrying one specific extension (case-insensitive),
    /// regardless of how this scanner was constructed
    pub fn scan_by_extension(
        &self,
        root_path: &Path,
        extension: &str,
    ) -> Result<Vec<BundleFile>, std::io::Error> {
        let wanted = extension.to_lowercase();
        let all = BundleScanner::new().scan(root_path)?;
        Ok(all
            .into_iter()
            .filter(|f| {
                Path::new(&f.relative_path)
                    .extension()
                    .map(|e| e.to_string_lossy().to_lowercase() == wanted)
                    .unwrap_or(false)
            })
            .collect())
    }

    /// Count files that this scanner would collect under a root
    pub fn count_files(&self, root_path: &Path) -> Result<usize, std::io::Error> {
        Ok(self.scan(root_path)?.len())
    }

    /// Total size in bytes of all files this scanner collects under a root
    pub fn total_size(&self, root_path: &Path) -> Result<u64, std::io::Error> {
        let mut total = 0u64;
        for file in self.scan(root_path)? {
            total += std::fs::metadata(&file.disk_path)?.len();
        }
        Ok(total)
    }

    /// Check whether a file passes the extension filter
    pub fn is_included(&self, path: &Path) -> bool {
        match &self.extensions {
            None => true,
            Some(extensions) => path
                .extension()
                .map(|e| {
                    let ext = e.to_string_lossy().to_lowercase();
                    extensions.contains(&ext.as_str())
                })
                .unwrap_or(false),
        }
    }
}

impl Default for BundleScanner {
    fn default() -> Self {
        Self::new()
    }
}

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::{write::FileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::core::archive::common::ArchiveFormat;
use crate::core::file_ops::scanner::BundleScanner;
use crate::models::{
    ArchiveEntry, ConflictPolicy, ExtractConfig, ExtractReport, PackConfig, PackReport,
    SitePackError,
};

/// ZIP container format
///
/// Handles creation and extraction of ZIP archives while preserving
/// directory hierarchy. Archives are written through a temporary file and
/// renamed into place, so a failed create never leaves a partial archive
/// behind.
pub struct ZipFormat;

impl ZipFormat {
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveFormat for ZipFormat {
    /// Extract a ZIP archive to a destination directory
    ///
    /// # Arguments
    /// * `archive_path` - Path to the ZIP file
    /// * `dest_dir` - Destination directory, created (with parents) if absent
    ///
    /// # Behavior
    /// - The archive must exist before any destination side effect happens
    /// - Entry names that would escape the destination are skipped
    /// - Collisions with existing files follow `config.conflict_policy`
    /// - Unix permission bits recorded in the archive are reapplied
    fn extract(
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

        let file = File::open(archive_path).map_err(|e| {
            SitePackError::Archive(format!(
                "Failed to open archive {}: {}",
                archive_path.display(),
                e
            ))
        })?;

        let mut archive = ZipArchive::new(file).map_err(|e| {
            SitePackError::CorruptedArchive(format!("{}: {}", archive_path.display(), e))
        })?;

        fs::create_dir_all(dest_dir).map_err(|e| {
            SitePackError::Archive(format!("Failed to create destination directory: {}", e))
        })?;

        let entry_count = archive.len();
        let mut written = 0usize;
        let mut skipped = 0usize;

        for i in 0..entry_count {
            let mut entry = archive.by_index(i).map_err(|e| {
                SitePackError::CorruptedArchive(format!("Failed to read entry at index {}: {}", i, e))
            })?;

            // Entry names with absolute or parent components stay inside the
            // destination by being dropped entirely
            let relative = match entry.enclosed_name() {
                Some(path) => path,
                None => {
                    tracing::warn!("Skipping entry with unsafe name: {}", entry.name());
                    skipped += 1;
                    continue;
                }
            };

            let output_path = dest_dir.join(&relative);

            if entry.is_dir() {
                fs::create_dir_all(&output_path).map_err(|e| {
                    SitePackError::Archive(format!(
                        "Failed to create directory {}: {}",
                        output_path.display(),
                        e
                    ))
                })?;
                continue;
            }

            if output_path.exists() {
                match config.conflict_policy {
                    ConflictPolicy::Overwrite => {}
                    ConflictPolicy::SkipExisting => {
                        skipped += 1;
                        continue;
                    }
                    ConflictPolicy::ErrorOnConflict => {
                        return Err(SitePackError::Conflict(output_path.display().to_string()));
                    }
                }
            }

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    SitePackError::Archive(format!(
                        "Failed to create parent directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }

            let mut output_file = File::create(&output_path).map_err(|e| {
                SitePackError::Archive(format!(
                    "Failed to create output file {}: {}",
                    output_path.display(),
                    e
                ))
            })?;

            io::copy(&mut entry, &mut output_file).map_err(|e| {
                SitePackError::Archive(format!(
                    "Failed to extract entry {}: {}",
                    relative.display(),
                    e
                ))
            })?;

            // Restore permissions on Unix systems
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&output_path, fs::Permissions::from_mode(mode)).map_err(
                        |e| SitePackError::Archive(format!("Failed to set permissions: {}", e)),
                    )?;
                }
            }

            written += 1;
        }

        tracing::info!(
            "Extracted {} to {} ({} written, {} skipped)",
            archive_path.display(),
            dest_dir.display(),
            written,
            skipped
        );

        Ok(ExtractReport {
            destination: dest_dir.display().to_string(),
            entry_count,
            written,
            skipped,
        })
    }

    /// Create a ZIP archive from a file or directory
    ///
    /// # Arguments
    /// * `source_path` - Regular file or directory to package
    /// * `output_path` - Path for the output ZIP file (parent must exist)
    ///
    /// # Behavior
    /// - A single file becomes one entry named by its base name
    /// - A directory is walked recursively; only leaf files become entries,
    ///   sorted by relative path so entry order is deterministic
    /// - Entries use Deflate (level from config); with `store_precompressed`
    ///   set, already-compressed formats are stored as-is
    /// - The archive is staged in a temporary file and renamed into place on
    ///   success
    fn create(
        &self,
        source_path: &Path,
        output_path: &Path,
        config: &PackConfig,
    ) -> Result<PackReport, SitePackError> {
        let entries: Vec<(String, std::path::PathBuf)> = if source_path.is_file() {
            let name = source_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| {
                    SitePackError::Archive(format!(
                        "Source file {} has no base name",
                        source_path.display()
                    ))
                })?;
            vec![(name, source_path.to_path_buf())]
        } else if source_path.is_dir() {
            let prefix = if config.include_root_dir {
                source_path
                    .file_name()
                    .map(|n| format!("{}/", n.to_string_lossy()))
                    .unwrap_or_default()
            } else {
                String::new()
            };

            BundleScanner::new()
                .scan(source_path)?
                .into_iter()
                // Zip entry names use forward slashes on every platform
                .map(|f| {
                    let name = format!("{}{}", prefix, f.relative_path.replace('\\', "/"));
                    (name, f.disk_path)
                })
                .collect()
        } else {
            return Err(SitePackError::SourceNotFound(
                source_path.display().to_string(),
            ));
        };

        tracing::debug!(
            "Packaging {} entries from {}",
            entries.len(),
            source_path.display()
        );

        // Stage next to the final path so the rename stays on one filesystem
        let staging_dir = match output_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(staging_dir).map_err(|e| {
            SitePackError::Archive(format!(
                "Failed to stage archive next to {}: {}",
                output_path.display(),
                e
            ))
        })?;

        let mut entry_count = 0usize;
        let mut total_bytes = 0u64;

        {
            let mut zip = ZipWriter::new(staged.as_file_mut());

            let deflate_opts = FileOptions::<()>::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(config.compression_level)
                .unix_permissions(0o644);
            let stored_opts = FileOptions::<()>::default()
                .compression_method(CompressionMethod::Stored)
                .unix_permissions(0o644);

            for (name, disk_path) in entries {
                let opts = if config.store_precompressed && is_already_compressed(&name) {
                    stored_opts
                } else {
                    deflate_opts
                };

                zip.start_file(&name, opts).map_err(|e| {
                    SitePackError::Archive(format!(
                        "Failed to start entry {} in archive: {}",
                        name, e
                    ))
                })?;

                let mut source = File::open(&disk_path).map_err(|e| {
                    SitePackError::Archive(format!(
                        "Failed to read file {}: {}",
                        disk_path.display(),
                        e
                    ))
                })?;

                let copied = io::copy(&mut source, &mut zip).map_err(|e| {
                    SitePackError::Archive(format!(
                        "Failed to write entry {} to archive: {}",
                        name, e
                    ))
                })?;

                entry_count += 1;
                total_bytes += copied;
            }

            zip.finish().map_err(|e| {
                SitePackError::Archive(format!("Failed to finalize archive: {}", e))
            })?;
        }

        staged.persist(output_path).map_err(|e| {
            SitePackError::Archive(format!(
                "Failed to move archive into place at {}: {}",
                output_path.display(),
                e.error
            ))
        })?;

        tracing::info!(
            "Created {} from {} ({} entries, {} bytes)",
            output_path.display(),
            source_path.display(),
            entry_count,
            total_bytes
        );

        Ok(PackReport {
            archive_path: output_path.display().to_string(),
            entry_count,
            total_bytes,
        })
    }

    /// List the entries of a ZIP archive in central-directory order
    fn list(&self, archive_path: &Path) -> Result<Vec<ArchiveEntry>, SitePackError> {
        if !archive_path.is_file() {
            return Err(SitePackError::ArchiveNotFound(
                archive_path.display().to_string(),
            ));
        }

        let file = File::open(archive_path).map_err(|e| {
            SitePackError::Archive(format!(
                "Failed to open archive {}: {}",
                archive_path.display(),
                e
            ))
        })?;

        let mut archive = ZipArchive::new(file).map_err(|e| {
            SitePackError::CorruptedArchive(format!("{}: {}", archive_path.display(), e))
        })?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index(i).map_err(|e| {
                SitePackError::CorruptedArchive(format!("Failed to read entry at index {}: {}", i, e))
            })?;
            entries.push(ArchiveEntry {
                name: entry.name().to_string(),
                size: entry.size(),
                compressed_size: entry.compressed_size(),
                is_dir: entry.is_dir(),
            });
        }

        Ok(entries)
    }

    /// Recognizes `.zip` paths, plus existing files that carry the ZIP
    /// magic regardless of how they were renamed
    fn supports(&self, archive_path: &Path) -> bool {
        let by_extension = archive_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("zip"))
            .unwrap_or(false);

        by_extension || has_zip_magic(archive_path)
    }
}

/// Returns true for formats that are already compressed and won't benefit
/// from another Deflate pass.
fn is_already_compressed(name: &str) -> bool {
    let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    matches!(
        ext.as_str(),
        "png" | "jpg" | "jpeg" | "gif" | "webp" | "woff" | "woff2" | "mp3" | "mp4" | "ogg"
            | "zip" | "7z" | "rar" | "gz"
    )
}

/// Check the local-file-header signature (also the empty-archive and
/// spanned-archive variants)
fn has_zip_magic(path: &Path) -> bool {
    let mut magic = [0u8; 4];
    match File::open(path).and_then(|mut f| f.read_exact(&mut magic)) {
        Ok(()) => matches!(&magic, b"PK\x03\x04" | b"PK\x05\x06" | b"PK\x07\x08"),
        Err(_) => false,
    }
}

impl Default for ZipFormat {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_site_files(dir: &Path) {
        fs::create_dir_all(dir.join("assets/css")).unwrap();
        fs::write(dir.join("index.html"), b"<html></html>").unwrap();
        fs::write(dir.join("about.html"), b"<html>about</html>").unwrap();
        fs::write(dir.join("assets/css/style.css"), b"body { margin: 0 }").unwrap();
    }

    #[test]
    fn test_create_and_extract_roundtrip() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        create_site_files(source.path());

        let format = ZipFormat::new();
        let zip_path = out.path().join("site.zip");
        let report = format
            .create(source.path(), &zip_path, &PackConfig::default())
            .unwrap();

        assert!(zip_path.exists());
        assert_eq!(report.entry_count, 3);

        let extract_report = format
            .extract(&zip_path, dest.path(), &ExtractConfig::default())
            .unwrap();
        assert_eq!(extract_report.written, 3);
        assert_eq!(extract_report.skipped, 0);

        assert_eq!(
            fs::read(dest.path().join("index.html")).unwrap(),
            b"<html></html>"
        );
        assert_eq!(
            fs::read(dest.path().join("assets/css/style.css")).unwrap(),
            b"body { margin: 0 }"
        );
    }

    #[test]
    fn test_single_file_source_uses_base_name() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let file = source.path().join("notes.txt");
        fs::write(&file, b"remember the milk").unwrap();

        let format = ZipFormat::new();
        let zip_path = out.path().join("notes.zip");
        let report = format.create(&file, &zip_path, &PackConfig::default()).unwrap();
        assert_eq!(report.entry_count, 1);

        let names: Vec<String> = format
            .list(&zip_path)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["notes.txt"]);

        format
            .extract(&zip_path, dest.path(), &ExtractConfig::default())
            .unwrap();
        assert_eq!(
            fs::read(dest.path().join("notes.txt")).unwrap(),
            b"remember the milk"
        );
    }

    #[test]
    fn test_site_bundle_scenario() {
        // autosite/ holding only index.html packs into a zip whose single
        // entry is index.html at the archive root
        let base = TempDir::new().unwrap();
        let site = base.path().join("autosite");
        fs::create_dir_all(&site).unwrap();
        fs::write(site.join("index.html"), b"<html></html>").unwrap();

        let format = ZipFormat::new();
        let zip_path = base.path().join("autosite_package.zip");
        format.create(&site, &zip_path, &PackConfig::default()).unwrap();

        let entries = format.list(&zip_path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "index.html");
        assert_eq!(entries[0].size, b"<html></html>".len() as u64);

        let dest = base.path().join("unpacked");
        format
            .extract(&zip_path, &dest, &ExtractConfig::default())
            .unwrap();
        assert_eq!(fs::read(dest.join("index.html")).unwrap(), b"<html></html>");
    }

    #[test]
    fn test_deep_nesting_roundtrip() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        fs::create_dir_all(source.path().join("a/b/c")).unwrap();
        fs::write(source.path().join("a/b/c/deep.txt"), b"deep file").unwrap();

        let format = ZipFormat::new();
        let zip_path = out.path().join("nested.zip");
        format
            .create(source.path(), &zip_path, &PackConfig::default())
            .unwrap();
        format
            .extract(&zip_path, dest.path(), &ExtractConfig::default())
            .unwrap();

        assert_eq!(
            fs::read(dest.path().join("a/b/c/deep.txt")).unwrap(),
            b"deep file"
        );
    }

    #[test]
    fn test_entries_sorted_by_relative_path() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        fs::write(source.path().join("zeta.txt"), b"z").unwrap();
        fs::write(source.path().join("alpha.txt"), b"a").unwrap();
        fs::create_dir_all(source.path().join("mid")).unwrap();
        fs::write(source.path().join("mid/beta.txt"), b"b").unwrap();

        let format = ZipFormat::new();
        let zip_path = out.path().join("sorted.zip");
        format
            .create(source.path(), &zip_path, &PackConfig::default())
            .unwrap();

        let names: Vec<String> = format
            .list(&zip_path)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["alpha.txt", "mid/beta.txt", "zeta.txt"]);
    }

    #[test]
    fn test_include_root_dir_prefixes_entries() {
        let base = TempDir::new().unwrap();
        let site = base.path().join("autosite");
        fs::create_dir_all(&site).unwrap();
        fs::write(site.join("index.html"), b"<html></html>").unwrap();

        let config = PackConfig {
            include_root_dir: true,
            ..Default::default()
        };

        let format = ZipFormat::new();
        let zip_path = base.path().join("rooted.zip");
        format.create(&site, &zip_path, &config).unwrap();

        let entries = format.list(&zip_path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "autosite/index.html");
    }

    #[test]
    fn test_create_missing_source() {
        let out = TempDir::new().unwrap();
        let zip_path = out.path().join("never.zip");

        let format = ZipFormat::new();
        let result = format.create(
            Path::new("/definitely/not/here"),
            &zip_path,
            &PackConfig::default(),
        );

        assert!(matches!(result, Err(SitePackError::SourceNotFound(_))));
        assert!(!zip_path.exists());
    }

    #[test]
    fn test_failed_create_leaves_no_partial_archive() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(source.path().join("index.html"), b"<html></html>").unwrap();

        // Output parent directories are not auto-created
        let zip_path = out.path().join("missing/sub/dir/site.zip");

        let format = ZipFormat::new();
        let result = format.create(source.path(), &zip_path, &PackConfig::default());

        assert!(result.is_err());
        assert!(!zip_path.exists());
    }

    #[test]
    fn test_extract_missing_archive_creates_nothing() {
        let base = TempDir::new().unwrap();
        let dest = base.path().join("never-created");

        let format = ZipFormat::new();
        let result = format.extract(
            Path::new("/definitely/not/here.zip"),
            &dest,
            &ExtractConfig::default(),
        );

        assert!(matches!(result, Err(SitePackError::ArchiveNotFound(_))));
        assert!(!dest.exists());
    }

    #[test]
    fn test_extract_invalid_archive() {
        let base = TempDir::new().unwrap();
        let fake = base.path().join("fake.zip");
        fs::write(&fake, b"this is just text, not an archive").unwrap();

        let format = ZipFormat::new();
        let result = format.extract(&fake, &base.path().join("dest"), &ExtractConfig::default());

        assert!(matches!(result, Err(SitePackError::CorruptedArchive(_))));
    }

    #[test]
    fn test_extract_is_idempotent() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        create_site_files(source.path());

        let format = ZipFormat::new();
        let zip_path = out.path().join("site.zip");
        format
            .create(source.path(), &zip_path, &PackConfig::default())
            .unwrap();

        let first = format
            .extract(&zip_path, dest.path(), &ExtractConfig::default())
            .unwrap();
        let second = format
            .extract(&zip_path, dest.path(), &ExtractConfig::default())
            .unwrap();

        assert_eq!(first.written, second.written);
        assert_eq!(
            fs::read(dest.path().join("index.html")).unwrap(),
            b"<html></html>"
        );
    }

    #[test]
    fn test_overwrite_policy_replaces_existing() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        fs::write(source.path().join("index.html"), b"<html></html>").unwrap();
        fs::write(dest.path().join("index.html"), b"stale").unwrap();

        let format = ZipFormat::new();
        let zip_path = out.path().join("site.zip");
        format
            .create(source.path(), &zip_path, &PackConfig::default())
            .unwrap();
        format
            .extract(&zip_path, dest.path(), &ExtractConfig::default())
            .unwrap();

        assert_eq!(
            fs::read(dest.path().join("index.html")).unwrap(),
            b"<html></html>"
        );
    }

    #[test]
    fn test_skip_existing_policy_keeps_file() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        fs::write(source.path().join("index.html"), b"<html></html>").unwrap();
        fs::write(dest.path().join("index.html"), b"hand-edited").unwrap();

        let config = ExtractConfig {
            conflict_policy: ConflictPolicy::SkipExisting,
        };

        let format = ZipFormat::new();
        let zip_path = out.path().join("site.zip");
        format
            .create(source.path(), &zip_path, &PackConfig::default())
            .unwrap();
        let report = format.extract(&zip_path, dest.path(), &config).unwrap();

        assert_eq!(report.written, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            fs::read(dest.path().join("index.html")).unwrap(),
            b"hand-edited"
        );
    }

    #[test]
    fn test_error_on_conflict_policy() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        fs::write(source.path().join("index.html"), b"<html></html>").unwrap();
        fs::write(dest.path().join("index.html"), b"precious").unwrap();

        let config = ExtractConfig {
            conflict_policy: ConflictPolicy::ErrorOnConflict,
        };

        let format = ZipFormat::new();
        let zip_path = out.path().join("site.zip");
        format
            .create(source.path(), &zip_path, &PackConfig::default())
            .unwrap();
        let result = format.extract(&zip_path, dest.path(), &config);

        assert!(matches!(result, Err(SitePackError::Conflict(_))));
        assert_eq!(
            fs::read(dest.path().join("index.html")).unwrap(),
            b"precious"
        );
    }

    #[test]
    fn test_store_precompressed_entries() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        fs::write(source.path().join("logo.png"), vec![0xAB; 256]).unwrap();

        let config = PackConfig {
            store_precompressed: true,
            ..Default::default()
        };

        let format = ZipFormat::new();
        let zip_path = out.path().join("assets.zip");
        format.create(source.path(), &zip_path, &config).unwrap();

        let entries = format.list(&zip_path).unwrap();
        assert_eq!(entries.len(), 1);
        // Stored entries keep their exact size
        assert_eq!(entries[0].compressed_size, entries[0].size);
    }

    #[test]
    fn test_create_empty_directory() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let format = ZipFormat::new();
        let zip_path = out.path().join("empty.zip");
        let report = format
            .create(source.path(), &zip_path, &PackConfig::default())
            .unwrap();

        assert_eq!(report.entry_count, 0);
        assert!(zip_path.exists());
    }

    #[test]
    fn test_supports() {
        let format = ZipFormat::new();
        assert!(format.supports(Path::new("archive.zip")));
        assert!(format.supports(Path::new("ARCHIVE.ZIP")));
        assert!(!format.supports(Path::new("archive.7z")));
        assert!(!format.supports(Path::new("noextension")));
    }

    #[test]
    fn test_supports_renamed_zip_by_magic() {
        let base = TempDir::new().unwrap();
        let site = base.path().join("site");
        fs::create_dir_all(&site).unwrap();
        fs::write(site.join("index.html"), b"<html></html>").unwrap();

        let format = ZipFormat::new();
        let odd_name = base.path().join("bundle.pkg");
        format.create(&site, &odd_name, &PackConfig::default()).unwrap();

        assert!(format.supports(&odd_name));
    }
}

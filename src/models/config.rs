use serde::{Deserialize, Serialize};

use crate::models::SitePackError;

/// Options for archive creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackConfig {
    /// Prefix every entry with the source directory's own name, so
    /// extraction reconstructs a top-level folder matching the source
    #[serde(default)]
    pub include_root_dir: bool,
    /// Deflate level 0-9 (None = codec default)
    #[serde(default)]
    pub compression_level: Option<i64>,
    /// Store already-compressed formats (PNG, JPG, ZIP…) without
    /// running them through Deflate again
    #[serde(default)]
    pub store_precompressed: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            include_root_dir: false,
            compression_level: None,
            store_precompressed: false,
        }
    }
}

impl PackConfig {
    /// Check the config before any filesystem work happens
    pub fn validate(&self) -> Result<(), SitePackError> {
        if let Some(level) = self.compression_level {
            if !(0..=9).contains(&level) {
                return Err(SitePackError::InvalidConfig(format!(
                    "compression level {} is outside the supported range 0-9",
                    level
                )));
            }
        }
        Ok(())
    }
}

/// What to do when an archive entry would land on an existing file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictPolicy {
    /// Replace the existing file (reference behavior)
    #[default]
    Overwrite,
    /// Keep the existing file and count the entry as skipped
    SkipExisting,
    /// Abort the extraction on the first collision
    ErrorOnConflict,
}

/// Options for archive extraction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractConfig {
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

use thiserror::Error;

/// Custom error types for the sitepack toolkit
#[derive(Error, Debug)]
pub enum SitePackError {
    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Unsupported archive format: {0}")]
    UnsupportedArchive(String),

    #[error("Source path not found: {0}")]
    SourceNotFound(String),

    #[error("Archive not found: {0}")]
    ArchiveNotFound(String),

    #[error("Corrupted archive: {0}")]
    CorruptedArchive(String),

    #[error("Destination conflict: {0}")]
    Conflict(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Convert to string for the tool-calling layer (tool functions return a plain
// status String in both directions)
impl From<SitePackError> for String {
    fn from(err: SitePackError) -> String {
        err.to_string()
    }
}

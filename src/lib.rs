//! # sitepack
//!
//! Site bundle packaging toolkit.
//!
//! An external content-generation pipeline writes a website into a folder;
//! sitepack turns that folder into a standard deflate-based zip bundle for
//! download, and expands a user-supplied archive into a working folder
//! before anything downstream inspects it. The toolkit owns no state across
//! calls: every operation checks its inputs on entry, runs synchronously on
//! the caller's thread, and reports through a typed error, or through a
//! single status string for text-oriented automation callers.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use sitepack::{ArchivePackager, ExtractConfig, PackConfig};
//!
//! fn main() -> Result<(), sitepack::SitePackError> {
//!     let packager = ArchivePackager::new();
//!
//!     // Bundle a generated site folder
//!     let report = packager.create(
//!         Path::new("autosite"),
//!         Path::new("autosite_package.zip"),
//!         &PackConfig::default(),
//!     )?;
//!     println!("{} entries written", report.entry_count);
//!
//!     // Expand an uploaded archive into a working folder
//!     packager.extract(
//!         Path::new("upload.zip"),
//!         Path::new("workdir"),
//!         &ExtractConfig::default(),
//!     )?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod commands;
pub mod core;
pub mod models;

pub use crate::commands::{create_archive, extract_archive, list_archive};
pub use crate::core::archive::{common::ArchiveFormat, zip_format::ZipFormat, ArchivePackager};
pub use crate::core::file_ops::{BundleScanner, SiteWorkspace};
pub use crate::models::{
    ArchiveEntry, BundleFile, ConflictPolicy, ExtractConfig, ExtractReport, PackConfig,
    PackReport, SitePackError,
};

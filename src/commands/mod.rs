pub mod archive;

pub use archive::{create_archive, extract_archive, list_archive};

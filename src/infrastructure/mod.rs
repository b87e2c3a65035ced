// Infrastructure implementations for droidarch.

use std::fs;
use std::path::Path;

use crate::error::{ArchError, Result};
use crate::ports::SourceReader;

pub mod manifest_parser;

pub use manifest_parser::ManifestParser;

/// Reads files from the local filesystem.
pub struct FsSourceReader;

impl SourceReader for FsSourceReader {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| ArchError::UnreadableInput {
            path: path.to_path_buf(),
            source,
        })
    }
}

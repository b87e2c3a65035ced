use std::path::Path;

use crate::domain::document::Document;
use crate::error::Result;

pub mod json_exporter;
pub mod xadl_exporter;

/// Reads manifest and component source text.
pub trait SourceReader {
    /// Whole file content, or `ArchError::UnreadableInput` naming the path.
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// Renders a finished architecture to text.
pub trait ArchitectureExporter {
    fn render(&self, doc: &Document) -> Result<String>;

    /// File extension for rendered output, without the dot.
    fn extension(&self) -> &'static str;
}

use std::path::Path;

use tracing::info;

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::infrastructure::ManifestParser;
use crate::ports::SourceReader;

pub mod diagnostic;
pub mod extractor;

pub use diagnostic::{Diagnostic, ExtractionReport};
pub use extractor::Extractor;

/// Manifest path in, architecture out.
pub struct ExtractUsecase<'a> {
    pub reader: &'a dyn SourceReader,
    pub config: &'a ExtractorConfig,
}

impl<'a> ExtractUsecase<'a> {
    pub fn run(
        &self,
        manifest_path: &Path,
        structure_name: &str,
        src_dir: Option<&Path>,
    ) -> Result<ExtractionReport> {
        let parser = ManifestParser::new(self.config.declaration_kinds.iter().cloned());
        let manifest = parser.parse_file(self.reader, manifest_path)?;
        info!(
            "parsed {} ({} declarations in package {})",
            manifest_path.display(),
            manifest.declarations.len(),
            manifest.package
        );

        let report = Extractor::new(self.reader, self.config)?.extract(
            &manifest,
            structure_name,
            src_dir,
        )?;
        info!(
            "extracted {} components, {} connectors, {} links ({} diagnostics)",
            report.document.components().count(),
            report.document.connectors().count(),
            report.document.links().count(),
            report.diagnostics.len()
        );
        Ok(report)
    }
}

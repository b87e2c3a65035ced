use std::path::Path;

use roxmltree::{Document as XmlDocument, Node};
use tracing::{debug, warn};

use crate::domain::manifest::{Declaration, Manifest, ANDROID_NS};
use crate::error::{ArchError, Result};
use crate::ports::SourceReader;

/// Reads `AndroidManifest.xml` into a [`Manifest`].
pub struct ManifestParser {
    kinds: Vec<String>,
}

impl ManifestParser {
    /// `kinds` are the element names under `<application>` that declare
    /// components, in processing order.
    pub fn new<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kinds: kinds.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse_file(&self, reader: &dyn SourceReader, path: &Path) -> Result<Manifest> {
        let content = reader.read_to_string(path)?;
        self.parse_str(&content, path)
    }

    /// Parse manifest text. `path` is only used in error messages.
    pub fn parse_str(&self, content: &str, path: &Path) -> Result<Manifest> {
        let xml = XmlDocument::parse(content).map_err(|e| ArchError::MalformedManifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let root = xml.root_element();

        let package = root
            .attribute("package")
            .ok_or_else(|| ArchError::MissingAttribute {
                path: path.to_path_buf(),
                element: root.tag_name().name().to_string(),
                attribute: "package".to_string(),
            })?
            .to_string();

        let mut manifest = Manifest {
            package,
            declarations: Vec::new(),
        };

        let Some(application) = root
            .children()
            .find(|n| n.is_element() && n.has_tag_name("application"))
        else {
            warn!("{} has no <application> element", path.display());
            return Ok(manifest);
        };

        for kind in &self.kinds {
            for node in application
                .children()
                .filter(|n| n.is_element() && n.has_tag_name(kind.as_str()))
            {
                let declaration = self.declaration(&manifest, kind, node, path)?;
                debug!(
                    "declared {} {} (intent filter: {})",
                    kind, declaration.qualified_name, declaration.has_intent_filter
                );
                manifest.declarations.push(declaration);
            }
        }

        Ok(manifest)
    }

    fn declaration(
        &self,
        manifest: &Manifest,
        kind: &str,
        node: Node,
        path: &Path,
    ) -> Result<Declaration> {
        let raw = node
            .attribute((ANDROID_NS, "name"))
            .ok_or_else(|| ArchError::MissingAttribute {
                path: path.to_path_buf(),
                element: kind.to_string(),
                attribute: "android:name".to_string(),
            })?;

        Ok(Declaration {
            kind: kind.to_string(),
            qualified_name: manifest.qualify(raw),
            has_intent_filter: node
                .children()
                .any(|c| c.is_element() && c.has_tag_name("intent-filter")),
        })
    }
}

impl Default for ManifestParser {
    fn default() -> Self {
        Self::new(crate::domain::manifest::DEFAULT_DECLARATION_KINDS)
    }
}

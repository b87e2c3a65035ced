//! Extraction settings, loadable from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::manifest::DEFAULT_DECLARATION_KINDS;
use crate::error::{ArchError, Result};
use crate::ports::SourceReader;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Keep `com.app.Main` instead of `Main` for component names.
    pub fully_qualified_names: bool,
    /// Extension of component source files, without the dot.
    pub source_extension: String,
    /// Simple name of the platform message class.
    pub message_type: String,
    pub qualified_message_type: String,
    /// Manifest elements that declare components, in processing order.
    pub declaration_kinds: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            fully_qualified_names: false,
            source_extension: "java".to_string(),
            message_type: "Intent".to_string(),
            qualified_message_type: "android.content.Intent".to_string(),
            declaration_kinds: DEFAULT_DECLARATION_KINDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl ExtractorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ArchError::Config {
            message: e.to_string(),
        })
    }

    pub fn load(reader: &dyn SourceReader, path: &Path) -> Result<Self> {
        let content = reader.read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ArchError::Config {
            message: format!("{}: {}", path.display(), e),
        })
    }
}

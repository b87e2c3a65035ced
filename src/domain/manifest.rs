//! Manifest declarations relevant to architecture extraction.

use std::path::{Path, PathBuf};

/// Namespace of the `android:` attributes.
pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

/// Element names treated as app components, in processing order.
pub const DEFAULT_DECLARATION_KINDS: [&str; 4] = ["activity", "service", "receiver", "provider"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub package: String,
    pub declarations: Vec<Declaration>,
}

/// One `<activity>`, `<service>`, `<receiver>` or `<provider>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Element name, e.g. `activity`
    pub kind: String,
    /// Fully qualified class name
    pub qualified_name: String,
    /// At least one `<intent-filter>` child is present
    pub has_intent_filter: bool,
}

impl Manifest {
    /// Expand Android shorthand (`.Main`, `Main`) against the package.
    pub fn qualify(&self, raw: &str) -> String {
        if let Some(rest) = raw.strip_prefix('.') {
            format!("{}.{}", self.package, rest)
        } else if !raw.contains('.') && !self.package.is_empty() {
            format!("{}.{}", self.package, raw)
        } else {
            raw.to_string()
        }
    }
}

impl Declaration {
    /// Name used for the component: qualified, or with `<package>.` stripped.
    pub fn display_name(&self, package: &str, fully_qualified: bool) -> String {
        if fully_qualified || package.is_empty() {
            return self.qualified_name.clone();
        }
        self.qualified_name
            .strip_prefix(package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(&self.qualified_name)
            .to_string()
    }

    /// `<src_dir>/com/app/Main.<extension>` for `com.app.Main`.
    pub fn source_path(&self, src_dir: &Path, extension: &str) -> PathBuf {
        let mut path = src_dir.to_path_buf();
        for segment in self.qualified_name.split('.') {
            path.push(segment);
        }
        path.set_extension(extension);
        path
    }
}

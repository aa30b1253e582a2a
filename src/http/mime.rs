//! MIME type lookup by file extension.

use std::collections::{HashMap, HashSet};
use std::path::Path;

const DEFAULT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("swf", "application/x-shockwave-flash"),
];

/// Immutable extension to content-type table.
///
/// The empty string is always a registered content type: it is what files
/// with an unknown extension are served as.
#[derive(Debug, Clone)]
pub struct ContentTypes {
    by_extension: HashMap<String, String>,
    registered: HashSet<String>,
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self::new(
            DEFAULT_TYPES
                .iter()
                .map(|(ext, ty)| (ext.to_string(), ty.to_string())),
        )
    }
}

impl ContentTypes {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let by_extension: HashMap<String, String> = entries
            .into_iter()
            .map(|(ext, ty)| (ext.to_ascii_lowercase(), ty))
            .collect();

        let mut registered: HashSet<String> = by_extension.values().cloned().collect();
        registered.insert(String::new());

        Self {
            by_extension,
            registered,
        }
    }

    /// Content type for a lowercase or mixed-case extension, `""` if unknown.
    pub fn for_extension(&self, ext: &str) -> &str {
        self.by_extension
            .get(&ext.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn for_path(&self, path: &Path) -> &str {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.for_extension(e))
            .unwrap_or("")
    }

    /// Whether `content_type` may appear in a success header.
    pub fn is_registered(&self, content_type: &str) -> bool {
        self.registered.contains(content_type)
    }
}

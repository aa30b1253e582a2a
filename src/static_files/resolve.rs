//! Mapping request paths onto the document root.
//!
//! A path is served only if its canonical form lies under the canonical
//! root. Any literal `/../` segment is refused outright, before the
//! filesystem is consulted.

use std::path::{Path, PathBuf};

/// Outcome of looking a request path up under the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A regular file to serve. `path` is canonical and is what gets
    /// opened; `requested` is the name as asked for, which picks the
    /// content type even when `path` is a symlink target.
    File { path: PathBuf, requested: PathBuf },
    /// Path leaves the root, or names a directory without an index
    Forbidden,
    /// Nothing there; carries the path that was looked up
    NotFound(PathBuf),
}

/// Joins `request_path` onto `root` without touching the filesystem.
///
/// Only the first leading slash is stripped, so `//etc` still joins as an
/// absolute path and is caught by [`resolve`].
pub fn join_root(root: &Path, request_path: &str) -> PathBuf {
    let relative = request_path.strip_prefix('/').unwrap_or(request_path);
    root.join(relative)
}

pub fn contains_parent_segment(path: &Path) -> bool {
    path.to_string_lossy().contains("/../")
}

/// Resolves `request_path` against `root`.
///
/// `root` must already be canonical. A directory resolves to its
/// `index_file`; a directory without one is [`Resolution::Forbidden`].
pub async fn resolve(root: &Path, index_file: &str, request_path: &str) -> Resolution {
    let joined = join_root(root, request_path);

    if contains_parent_segment(&joined) || !joined.starts_with(root) {
        return Resolution::Forbidden;
    }

    let canonical = match tokio::fs::canonicalize(&joined).await {
        Ok(path) => path,
        Err(_) => return Resolution::NotFound(joined),
    };
    if !canonical.starts_with(root) {
        return Resolution::Forbidden;
    }

    let metadata = match tokio::fs::metadata(&canonical).await {
        Ok(metadata) => metadata,
        Err(_) => return Resolution::NotFound(joined),
    };

    if metadata.is_dir() {
        let Ok(index) = tokio::fs::canonicalize(canonical.join(index_file)).await else {
            return Resolution::Forbidden;
        };
        if index.starts_with(root) && is_file(&index).await {
            return Resolution::File {
                path: index,
                requested: joined.join(index_file),
            };
        }
        return Resolution::Forbidden;
    }

    if metadata.is_file() {
        Resolution::File {
            path: canonical,
            requested: joined,
        }
    } else {
        Resolution::NotFound(joined)
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

//! Serving files from the document root.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWrite;

use crate::config::StaticFilesConfig;
use crate::http::mime::ContentTypes;
use crate::http::request::{Method, ParsedRequest};
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;
use crate::static_files::resolve::{Resolution, resolve};

/// Answers parsed requests with files from under a document root.
#[derive(Debug)]
pub struct StaticFileHandler {
    /// Canonical document root
    root: PathBuf,

    /// File served in place of a directory
    index_file: String,

    content_types: ContentTypes,
}

impl StaticFileHandler {
    /// Create a handler for an already canonical `root`.
    pub fn new(root: PathBuf, index_file: impl Into<String>, content_types: ContentTypes) -> Self {
        Self {
            root,
            index_file: index_file.into(),
            content_types,
        }
    }

    /// Create a handler from configuration, canonicalizing the root.
    pub fn from_config(config: &StaticFilesConfig) -> std::io::Result<Self> {
        let root = std::fs::canonicalize(&config.root)?;
        let content_types = match &config.content_types {
            Some(table) => ContentTypes::new(table.clone()),
            None => ContentTypes::default(),
        };
        Ok(Self::new(root, config.index_file.clone(), content_types))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// Resolve `request` and write the full response through `response`.
    ///
    /// Forbidden and missing paths get a bodyless 403 or 404. A found file
    /// is opened once; its length comes from that handle and the body is
    /// streamed from it, except for HEAD where the body is left out.
    pub async fn handle<W>(
        &self,
        request: &ParsedRequest,
        response: &mut ResponseWriter<'_, W>,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let (path, requested) = match resolve(&self.root, &self.index_file, request.path()).await {
            Resolution::File { path, requested } => (path, requested),
            Resolution::Forbidden => {
                response.write_header(StatusCode::Forbidden, 0, "").await?;
                return Ok(());
            }
            Resolution::NotFound(path) => {
                tracing::warn!(path = %path.display(), "Path does not exist");
                response.write_header(StatusCode::NotFound, 0, "").await?;
                return Ok(());
            }
        };

        let file = File::open(&path)
            .await
            .with_context(|| format!("failed to open {}", path.display()))?;
        let content_length = file
            .metadata()
            .await
            .with_context(|| format!("failed to stat {}", path.display()))?
            .len();
        let content_type = self.content_types.for_path(&requested);

        response
            .write_header(StatusCode::Ok, content_length, content_type)
            .await?;

        if request.method() == Method::HEAD {
            return Ok(());
        }

        response.write_file(file).await?;
        Ok(())
    }
}

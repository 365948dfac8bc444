//! Media storage collaborator
//!
//! The file store block hands a file reference to a [`MediaStore`] together
//! with the execution id. [`LocalMediaStore`] keeps files under
//! `<root>/exec_file/<graph_exec_id>/` and accepts `data:` URIs, `http(s)://`
//! URLs and paths relative to that directory.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Execution id cannot be used as a directory name
    #[error("invalid execution id: {0:?}")]
    InvalidExecutionId(String),

    /// Reference kind not handled by this store
    #[error("unsupported file source: {0}")]
    UnsupportedSource(String),

    /// Malformed data URI
    #[error("invalid data URI: {0}")]
    InvalidDataUri(String),

    /// Path escapes the execution directory
    #[error("path {0:?} is outside the execution directory")]
    PathOutsideRoot(String),

    /// Referenced local file does not exist
    #[error("file not found: {0}")]
    NotFound(String),

    /// Remote fetch failed or answered with an error status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores files referenced by blocks
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `file` for the given execution.
    ///
    /// Returns the stored reference, or the content as a `data:` URI when
    /// `return_content` is set.
    async fn store(
        &self,
        graph_exec_id: &str,
        file: &str,
        return_content: bool,
    ) -> Result<String, StorageError>;
}

/// Media store backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    client: Client,
}

impl LocalMediaStore {
    /// Create a store rooted at `root`; directories are created lazily
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            client: Client::new(),
        }
    }

    /// Use `client` for remote fetches
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the files of one execution
    pub fn execution_dir(&self, graph_exec_id: &str) -> Result<PathBuf, StorageError> {
        let valid = !graph_exec_id.is_empty()
            && graph_exec_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidExecutionId(graph_exec_id.to_string()));
        }
        Ok(self.root.join("exec_file").join(graph_exec_id))
    }

    async fn write_data_uri(&self, base: &Path, uri: &str) -> Result<PathBuf, StorageError> {
        let (header, payload) = uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .ok_or_else(|| StorageError::InvalidDataUri("missing ',' separator".into()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| StorageError::InvalidDataUri("only base64 payloads are supported".into()))?;
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| StorageError::InvalidDataUri(e.to_string()))?;

        let name = format!("{}.{}", Uuid::new_v4(), extension_for(essence(mime)));
        tokio::fs::write(base.join(&name), bytes).await?;
        Ok(PathBuf::from(name))
    }

    async fn fetch_url(&self, base: &Path, url: &str) -> Result<PathBuf, StorageError> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|mime| extension_for(essence(mime)));
        // fall back to the extension in the URL path
        let extension = match declared {
            Some(ext) if ext != "bin" => ext,
            _ => extension_for(mime_for(Path::new(response.url().path()))),
        };

        let bytes = response.bytes().await?;
        let name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(base.join(&name), &bytes).await?;
        tracing::debug!(url, bytes = bytes.len(), "fetched remote media");
        Ok(PathBuf::from(name))
    }

    async fn resolve_local(&self, base: &Path, file: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(file);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !contained {
            return Err(StorageError::PathOutsideRoot(file.to_string()));
        }
        if !tokio::fs::try_exists(base.join(relative)).await? {
            return Err(StorageError::NotFound(file.to_string()));
        }
        Ok(relative.to_path_buf())
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(
        &self,
        graph_exec_id: &str,
        file: &str,
        return_content: bool,
    ) -> Result<String, StorageError> {
        let base = self.execution_dir(graph_exec_id)?;
        tokio::fs::create_dir_all(&base).await?;

        let stored = if file.starts_with("data:") {
            self.write_data_uri(&base, file).await?
        } else if let Some((scheme, _)) = file.split_once("://") {
            if !(scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")) {
                return Err(StorageError::UnsupportedSource(file.to_string()));
            }
            self.fetch_url(&base, file).await?
        } else {
            self.resolve_local(&base, file).await?
        };

        tracing::debug!(
            graph_exec_id,
            path = %stored.display(),
            "stored media file"
        );

        if return_content {
            let bytes = tokio::fs::read(base.join(&stored)).await?;
            Ok(format!("data:{};base64,{}", mime_for(&stored), BASE64.encode(bytes)))
        } else {
            Ok(stored.to_string_lossy().into_owned())
        }
    }
}

const MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("mp4", "video/mp4"),
    ("pdf", "application/pdf"),
    ("json", "application/json"),
    ("csv", "text/csv"),
    ("txt", "text/plain"),
];

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let ext = if ext == "jpeg" { "jpg".to_string() } else { ext };
    MIME_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}

/// Media type without its parameters (`text/plain;charset=utf-8` -> `text/plain`)
fn essence(mime: &str) -> &str {
    mime.split(';').next().unwrap_or_default().trim()
}

fn extension_for(mime: &str) -> &'static str {
    MIME_TYPES
        .iter()
        .find(|(_, m)| m.eq_ignore_ascii_case(mime))
        .map(|(ext, _)| *ext)
        .unwrap_or("bin")
}

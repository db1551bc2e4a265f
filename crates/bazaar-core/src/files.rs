//! File storage for product media and content images.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{ShopError, ShopResult};

/// What an upload is used for; decides the target directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Video,
    Document,
}

impl UploadKind {
    /// Directory (and URL segment) the file is stored under.
    pub fn directory(&self) -> &'static str {
        match self {
            UploadKind::Image | UploadKind::Video => "uploads",
            UploadKind::Document => "documents",
        }
    }
}

/// A file received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name.
    pub file_name: String,
    /// MIME type, if known.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Persists uploaded files and returns a retrieval URL.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store an upload and return the URL it can be fetched from.
    async fn store(&self, kind: UploadKind, upload: &Upload) -> ShopResult<String>;
}

/// Stores files on the local disk under `root/<directory>/`.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    public_base: String,
}

impl LocalFileStorage {
    /// `public_base` is prepended to the returned URLs (e.g. `/static`).
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_for(&self, directory: &str, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base.trim_end_matches('/'),
            directory,
            name
        )
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, kind: UploadKind, upload: &Upload) -> ShopResult<String> {
        let name = stored_name(&upload.file_name)?;
        let directory = self.root.join(kind.directory());

        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(|e| ShopError::Upstream(format!("create {}: {}", directory.display(), e)))?;
        let path = directory.join(&name);
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| ShopError::Upstream(format!("write {}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), bytes = upload.bytes.len(), "Stored upload");
        Ok(self.url_for(kind.directory(), &name))
    }
}

/// Build a unique, path-safe file name from the client's file name.
fn stored_name(file_name: &str) -> ShopResult<String> {
    let base = Path::new(file_name.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let safe: String = base
        .chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' => c,
            _ => '_',
        })
        .collect();
    if safe.trim_matches(|c| c == '.' || c == '_').is_empty() {
        return Err(ShopError::validation("file_name", "must not be empty"));
    }

    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    Ok(format!("{}-{:04x}-{}", millis, rand::random::<u16>(), safe))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_image_and_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/static/");

        let url = storage
            .store(UploadKind::Image, &Upload::new("panel.jpg", b"jpeg".to_vec()))
            .await
            .unwrap();
        assert!(url.starts_with("/static/uploads/"));
        assert!(url.ends_with("-panel.jpg"));

        let url = storage
            .store(UploadKind::Document, &Upload::new("spec sheet.pdf", b"pdf".to_vec()))
            .await
            .unwrap();
        assert!(url.starts_with("/static/documents/"));
        assert!(url.ends_with("-spec_sheet.pdf"));

        let stored = std::fs::read_dir(dir.path().join("documents")).unwrap().count();
        assert_eq!(stored, 1);
    }

    #[tokio::test]
    async fn test_path_components_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "");

        let url = storage
            .store(UploadKind::Video, &Upload::new("../../etc/demo.mp4", b"mp4".to_vec()))
            .await
            .unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-demo.mp4"));
        assert!(!url.contains(".."));
    }

    #[tokio::test]
    async fn test_empty_file_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "");
        let err = storage
            .store(UploadKind::Image, &Upload::new("  ", b"x".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
    }
}

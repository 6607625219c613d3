//! Local-disk file store.
//!
//! Files land under the configured upload directory with a UUID prefix
//! and are served back under `/static/{stored_name}`. There is no size
//! or dimension limit at this layer.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use agora_core::FileId;

/// Errors that can occur while storing a file.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored file, as reported back to the uploader.
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    pub id: FileId,
    pub url: String,
}

/// Writes uploads to the local disk and hands out public URLs.
#[derive(Clone)]
pub struct FileStore {
    dir: PathBuf,
    base_url: String,
}

impl FileStore {
    /// Create a file store rooted at `dir`; URLs are built from
    /// `base_url` + `/static/`.
    #[must_use]
    pub fn new(dir: PathBuf, base_url: &str) -> Self {
        Self {
            dir,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Persist one file and return its id and public URL.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if the directory cannot be created or
    /// the file cannot be written.
    pub async fn store(&self, filename: &str, bytes: &[u8]) -> Result<StoredFile, UploadError> {
        let id = FileId::generate();
        let stored_name = format!("{id}-{}", sanitize_filename(filename));
        let path = self.dir.join(&stored_name);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(path = %path.display(), "stored upload");

        Ok(StoredFile {
            id,
            url: format!("{}/static/{stored_name}", self.base_url),
        })
    }
}

/// Keep stored names flat and URL-safe: path separators and control
/// characters are replaced, everything else passes through.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '?' | '#' | '%' | '&' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "file".to_owned()
    } else {
        cleaned
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("photo 1.png"), "photo 1.png");
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename(".."), "file");
    }

    #[tokio::test]
    async fn test_store_writes_file_and_builds_url() {
        let dir = std::env::temp_dir().join(format!("agora-test-{}", FileId::generate()));
        let store = FileStore::new(dir.clone(), "http://localhost:9000/");

        let stored = store.store("logo.png", b"pngbytes").await.unwrap();
        assert!(stored.url.starts_with("http://localhost:9000/static/"));
        assert!(stored.url.ends_with("-logo.png"));

        let stored_name = stored.url.rsplit('/').next().unwrap();
        let on_disk = tokio::fs::read(dir.join(stored_name)).await.unwrap();
        assert_eq!(on_disk, b"pngbytes");

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }
}

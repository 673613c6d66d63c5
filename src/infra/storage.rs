//! Local filesystem asset storage.
//!
//! Uploaded files (report evidence, resumes, news images, order
//! documents) land under a single flat directory and are served back
//! under [`UPLOAD_URL_PREFIX`]. Stored names are fresh UUIDs, so a
//! public URL never leaks the uploader's filename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use uuid::Uuid;

use crate::config::{DEFAULT_UPLOAD_DIR, MAX_UPLOAD_BYTES, UPLOAD_URL_PREFIX};
use crate::errors::{AppError, AppResult};

/// Persistence for uploaded binary assets.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store the bytes of one uploaded file and return its public URL.
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> AppResult<String>;

    /// Remove a previously stored asset by its public URL.
    ///
    /// Returns false when the URL does not point into this store or the
    /// file is already gone. Never fails the caller for a missing file.
    async fn delete(&self, url: &str) -> AppResult<bool>;
}

/// Asset store writing to a directory on the local disk.
#[derive(Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for LocalAssetStore {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_DIR)
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> AppResult<String> {
        if bytes.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::validation(format!(
                "Uploaded file exceeds the {} byte limit",
                MAX_UPLOAD_BYTES
            )));
        }

        let file_name = format!("{}.{}", Uuid::new_v4(), sanitize_extension(suggested_name));

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(storage_error)?;
        tokio::fs::write(self.root.join(&file_name), bytes)
            .await
            .map_err(storage_error)?;

        tracing::debug!(file = %file_name, "Asset stored");

        Ok(format!("{}{}", UPLOAD_URL_PREFIX, file_name))
    }

    async fn delete(&self, url: &str) -> AppResult<bool> {
        let Some(file_name) = url.strip_prefix(UPLOAD_URL_PREFIX) else {
            return Ok(false);
        };

        // Stored names are flat UUIDs; anything with a path component is
        // not ours and must not reach the filesystem.
        if file_name.is_empty() || file_name.contains('/') || file_name.contains("..") {
            return Ok(false);
        }

        match tokio::fs::remove_file(self.root.join(file_name)).await {
            Ok(()) => {
                tracing::debug!(file = %file_name, "Asset removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage_error(e)),
        }
    }
}

/// Derive a safe file extension from the client-supplied name.
///
/// Only lowercase alphanumerics survive; everything else collapses to
/// a generic "bin" so hostile names cannot smuggle path syntax.
fn sanitize_extension(suggested_name: &str) -> String {
    let ext = Path::new(suggested_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let cleaned: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(10)
        .collect::<String>()
        .to_lowercase();

    if cleaned.is_empty() {
        "bin".to_string()
    } else {
        cleaned
    }
}

fn storage_error(e: std::io::Error) -> AppError {
    tracing::error!("Asset storage error: {}", e);
    AppError::internal(format!("Asset storage error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store() -> LocalAssetStore {
        LocalAssetStore::new(std::env::temp_dir().join(format!("assets-{}", Uuid::new_v4())))
    }

    #[test]
    fn test_sanitize_extension() {
        assert_eq!(sanitize_extension("photo.JPG"), "jpg");
        assert_eq!(sanitize_extension("resume.pdf"), "pdf");
        assert_eq!(sanitize_extension("archive.tar.gz"), "gz");
        assert_eq!(sanitize_extension("no_extension"), "bin");
        assert_eq!(sanitize_extension("evil.p/../df"), "bin");
    }

    #[tokio::test]
    async fn test_store_then_delete() {
        let store = scratch_store();

        let url = store.store(b"fake image".to_vec(), "report.png").await.unwrap();
        assert!(url.starts_with(UPLOAD_URL_PREFIX));
        assert!(url.ends_with(".png"));

        assert!(store.delete(&url).await.unwrap());
        assert!(!store.delete(&url).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_rejects_empty_file() {
        let store = scratch_store();
        let err = store.store(Vec::new(), "empty.png").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_ignores_foreign_urls() {
        let store = scratch_store();
        assert!(!store.delete("https://elsewhere.example/x.png").await.unwrap());
        assert!(!store.delete("/uploads/../etc/passwd").await.unwrap());
    }
}

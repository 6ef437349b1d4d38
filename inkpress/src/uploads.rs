//! Local filesystem storage for uploaded cover images.
//!
//! Uploaded files are written under the configured uploads directory with a
//! generated name, and served back by the static file route at `/uploads/*`.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::errors::Result;

/// Filesystem store for uploaded assets.
#[derive(Debug, Clone)]
pub struct AssetStore {
    base_dir: PathBuf,
}

impl AssetStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// The directory files are stored in, for wiring up static serving.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create the uploads directory if missing. Called once at startup.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .with_context(|| format!("create uploads directory {}", self.base_dir.display()))?;
        Ok(())
    }

    /// Store uploaded bytes under a generated name, keeping the original extension.
    ///
    /// Returns the web path (`uploads/{name}`) to persist alongside the post.
    pub async fn store(&self, original_filename: Option<&str>, content: &[u8]) -> Result<String> {
        let file_uuid = Uuid::new_v4();

        // Keep the original extension (lowercased) so browsers infer the content type
        let filename = match original_filename.and_then(extension_of) {
            Some(ext) => format!("{file_uuid}.{ext}"),
            None => file_uuid.to_string(),
        };

        let full_path = self.base_dir.join(&filename);

        let mut file = fs::File::create(&full_path)
            .await
            .with_context(|| format!("create upload file {}", full_path.display()))?;
        file.write_all(content).await.context("write upload content")?;
        file.sync_all().await.context("sync upload content")?;

        Ok(format!("uploads/{filename}"))
    }
}

/// Lowercased extension of an uploaded filename, if it has a usable one.
fn extension_of(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    // Only keep simple extensions; anything odd is dropped rather than sanitized
    if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_keeps_extension() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().to_path_buf());
        store.ensure_dir().await.unwrap();

        let path = store.store(Some("Photo.JPG"), b"fake image bytes").await.unwrap();
        assert!(path.starts_with("uploads/"));
        assert!(path.ends_with(".jpg"));

        let filename = path.strip_prefix("uploads/").unwrap();
        let on_disk = tokio::fs::read(dir.path().join(filename)).await.unwrap();
        assert_eq!(on_disk, b"fake image bytes");
    }

    #[tokio::test]
    async fn test_store_without_extension() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().to_path_buf());
        store.ensure_dir().await.unwrap();

        let path = store.store(Some("coverimage"), b"bytes").await.unwrap();
        let filename = path.strip_prefix("uploads/").unwrap();
        assert!(!filename.contains('.'));
    }

    #[tokio::test]
    async fn test_generated_names_unique() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().to_path_buf());
        store.ensure_dir().await.unwrap();

        let a = store.store(Some("a.png"), b"one").await.unwrap();
        let b = store.store(Some("a.png"), b"two").await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.png"), Some("png".to_string()));
        assert_eq!(extension_of("archive.tar.GZ"), Some("gz".to_string()));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of("weird.p?g"), None);
    }
}

//! Media attachment storage.
//!
//! Attachments live on the local media root under a fixed `posts/` prefix.
//! Files are accepted when their bytes sniff as an image; the stored key
//! (`posts/<uuid>.<ext>`) is what post rows reference.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Key prefix (and subdirectory) for post attachments.
pub const POSTS_PREFIX: &str = "posts";

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an uploaded post image and return its media key.
    ///
    /// The payload must sniff as an image; anything else is rejected before
    /// touching the filesystem.
    pub async fn store_post_image(&self, bytes: &[u8]) -> Result<String> {
        let format = image::guess_format(bytes)
            .map_err(|_| AppError::BadRequest("File is not an image".to_string()))?;
        let extension = preferred_extension(format);

        let key = format!("{}/{}.{}", POSTS_PREFIX, Uuid::new_v4(), extension);
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to create media dir: {}", e)))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write attachment: {}", e)))?;

        Ok(key)
    }

    /// Whether a stored attachment exists for the given media key.
    pub async fn contains(&self, key: &str) -> bool {
        tokio::fs::try_exists(self.root.join(key))
            .await
            .unwrap_or(false)
    }
}

fn preferred_extension(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("bin")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid GIF: 2x1, one color table entry.
    const SMALL_GIF: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
        0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
        0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
    ];

    #[tokio::test]
    async fn stores_image_under_posts_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let key = store.store_post_image(SMALL_GIF).await.unwrap();
        assert!(key.starts_with("posts/"));
        assert!(key.ends_with(".gif"));
        assert!(store.contains(&key).await);

        let written = tokio::fs::read(dir.path().join(&key)).await.unwrap();
        assert_eq!(written, SMALL_GIF);
    }

    #[tokio::test]
    async fn rejects_non_image_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let err = store.store_post_image(b"just some text").await.unwrap_err();
        match err {
            AppError::BadRequest(_) => {}
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }
}

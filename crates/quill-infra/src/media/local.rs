//! Filesystem media store.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::ports::{ImageFormat, MediaError, MediaStore};

/// Where uploads are written and the URL prefix they are served under.
#[derive(Debug, Clone)]
pub struct LocalMediaConfig {
    pub root: PathBuf,
    pub public_base_url: String,
}

impl LocalMediaConfig {
    /// Read `UPLOAD_DIR` and `MEDIA_PUBLIC_URL`.
    pub fn from_env() -> Self {
        Self {
            root: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            public_base_url: std::env::var("MEDIA_PUBLIC_URL")
                .unwrap_or_else(|_| "/uploads".to_string()),
        }
    }
}

/// Writes each upload to `<root>/<folder>/<uuid>.<ext>`.
pub struct LocalMediaStore {
    config: LocalMediaConfig,
}

impl LocalMediaStore {
    pub fn new(config: LocalMediaConfig) -> Self {
        Self { config }
    }

    fn valid_folder(folder: &str) -> bool {
        !folder.is_empty()
            && folder
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(
        &self,
        folder: &str,
        format: ImageFormat,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        if !Self::valid_folder(folder) {
            return Err(MediaError::Storage(format!("invalid folder name: {folder}")));
        }

        let dir = self.config.root.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| MediaError::Storage(e.to_string()))?;

        let file_name = format!("{}.{}", Uuid::new_v4(), format.extension());
        tokio::fs::write(dir.join(&file_name), bytes)
            .await
            .map_err(|e| MediaError::Storage(e.to_string()))?;

        tracing::debug!(folder, file = %file_name, size = bytes.len(), "Stored upload");

        Ok(format!(
            "{}/{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            folder,
            file_name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (LocalMediaStore, PathBuf) {
        let root = std::env::temp_dir().join(format!("quill-media-{}", Uuid::new_v4()));
        let store = LocalMediaStore::new(LocalMediaConfig {
            root: root.clone(),
            public_base_url: "https://cdn.example.com/media/".to_string(),
        });
        (store, root)
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_url() {
        let (store, root) = store();

        let url = store
            .store("avatars", ImageFormat::Png, &[0x89, b'P', b'N', b'G'])
            .await
            .unwrap();

        assert!(url.starts_with("https://cdn.example.com/media/avatars/"));
        assert!(url.ends_with(".png"));
        let file_name = url.rsplit('/').next().unwrap();
        let written = tokio::fs::read(root.join("avatars").join(file_name))
            .await
            .unwrap();
        assert_eq!(written.len(), 4);

        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected() {
        let (store, _root) = store();

        let result = store.store("covers", ImageFormat::Jpeg, &[]).await;

        assert!(matches!(result, Err(MediaError::Empty)));
    }

    #[tokio::test]
    async fn test_folder_traversal_is_rejected() {
        let (store, _root) = store();

        let result = store.store("../etc", ImageFormat::Jpeg, b"x").await;

        assert!(matches!(result, Err(MediaError::Storage(_))));
    }
}

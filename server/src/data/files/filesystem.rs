//! Filesystem-based object store
//!
//! Stores media on the local filesystem with a sharded directory structure:
//! `{base_path}/{folder}/{key[0:2]}/{key}.{ext}`
//!
//! Public URLs mirror that layout under `{public_base_url}/media/`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::error::ObjectStoreError;
use super::storage::ObjectStore;
use super::{MediaFolder, MediaUpload, StoredObject};
use crate::core::constants::MEDIA_ROUTE_PATH;

const MAX_EXTENSION_LEN: usize = 10;
const FALLBACK_EXTENSION: &str = "bin";

/// Filesystem-based object store
#[derive(Debug, Clone)]
pub struct FilesystemObjectStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl FilesystemObjectStore {
    pub fn new(base_path: PathBuf, public_base_url: &str) -> Self {
        Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Relative object path: `{folder}/{key[0:2]}/{key}.{ext}`
    fn object_key(folder: MediaFolder, key: &str, ext: &str) -> String {
        format!("{}/{}/{}.{}", folder.as_str(), &key[0..2], key, ext)
    }

    fn url_prefix(&self) -> String {
        format!("{}{}/", self.public_base_url, MEDIA_ROUTE_PATH)
    }

    /// Map a public URL back to a path under `base_path`
    ///
    /// Only URLs this store produced are accepted.
    fn path_for_url(&self, url: &str) -> Result<PathBuf, ObjectStoreError> {
        let invalid = || ObjectStoreError::InvalidUrl(url.to_string());
        let relative = url.strip_prefix(&self.url_prefix()).ok_or_else(invalid)?;

        let parts: Vec<&str> = relative.split('/').collect();
        let [folder, shard, file] = parts.as_slice() else {
            return Err(invalid());
        };

        let known_folder = [
            MediaFolder::Videos,
            MediaFolder::Thumbnails,
            MediaFolder::Avatars,
            MediaFolder::CoverImages,
        ]
        .iter()
        .any(|f| f.as_str() == *folder);

        let safe = |s: &str| {
            !s.is_empty()
                && !s.starts_with('.')
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        };

        if !known_folder || !safe(shard) || !safe(file) || !file.starts_with(shard) {
            return Err(invalid());
        }

        Ok(self.base_path.join(folder).join(shard).join(file))
    }

    async fn ensure_parent_dirs(&self, path: &Path) -> Result<(), ObjectStoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Clean up empty parent directories after deletion (best effort)
    async fn cleanup_empty_parents(&self, file_path: &Path) {
        let mut current = file_path.parent();

        while let Some(dir) = current {
            if dir == self.base_path || !dir.starts_with(&self.base_path) {
                break;
            }
            match fs::remove_dir(dir).await {
                Ok(_) => {
                    tracing::trace!(path = %dir.display(), "Removed empty directory");
                    current = dir.parent();
                }
                Err(_) => break,
            }
        }
    }
}

/// File extension from the upload's name, else from its content type
fn extension_for(upload: &MediaUpload, content_type: Option<&str>) -> String {
    let from_name = upload
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase());

    from_name
        .or_else(|| {
            content_type
                .and_then(mime_guess::get_mime_extensions_str)
                .and_then(|exts| exts.first())
                .map(|ext| ext.to_string())
        })
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

fn resource_type_for(content_type: Option<&str>, folder: MediaFolder) -> &'static str {
    match content_type {
        Some(ct) if ct.starts_with("video/") || ct.starts_with("audio/") => "video",
        Some(ct) if ct.starts_with("image/") => "image",
        Some(_) => "raw",
        None => match folder {
            MediaFolder::Videos => "video",
            _ => "image",
        },
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn upload(
        &self,
        folder: MediaFolder,
        upload: MediaUpload,
    ) -> Result<StoredObject, ObjectStoreError> {
        let content_type = upload.effective_content_type();
        let ext = extension_for(&upload, content_type.as_deref());
        let key = cuid2::create_id();
        let relative = Self::object_key(folder, &key, &ext);

        let path = self.base_path.join(&relative);
        self.ensure_parent_dirs(&path).await?;
        fs::write(&path, &upload.data).await?;

        tracing::debug!(
            folder = folder.as_str(),
            size = upload.data.len(),
            path = %path.display(),
            "Object stored"
        );

        Ok(StoredObject {
            url: format!("{}{}", self.url_prefix(), relative),
            duration: None,
            width: None,
            height: None,
            resource_type: resource_type_for(content_type.as_deref(), folder).to_string(),
            format: ext,
        })
    }

    async fn delete(&self, url: &str) -> Result<(), ObjectStoreError> {
        let path = self.path_for_url(url)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Object deleted");
                self.cleanup_empty_parents(&path).await;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ObjectStoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FilesystemObjectStore {
        FilesystemObjectStore::new(dir.path().to_path_buf(), "http://localhost:8000/")
    }

    fn upload(name: &str, content_type: &str, data: &[u8]) -> MediaUpload {
        MediaUpload {
            file_name: Some(name.to_string()),
            content_type: Some(content_type.to_string()),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_upload_writes_sharded_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let stored = store
            .upload(MediaFolder::Videos, upload("clip.MP4", "video/mp4", b"frames"))
            .await
            .unwrap();

        assert!(stored.url.starts_with("http://localhost:8000/media/videos/"));
        assert!(stored.url.ends_with(".mp4"));
        assert_eq!(stored.format, "mp4");
        assert_eq!(stored.resource_type, "video");
        assert_eq!(stored.duration, None);

        let path = store.path_for_url(&stored.url).unwrap();
        assert!(path.starts_with(temp_dir.path().join("videos")));
        assert_eq!(fs::read(&path).await.unwrap(), b"frames");
    }

    #[tokio::test]
    async fn test_same_bytes_get_distinct_objects() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let a = store
            .upload(MediaFolder::Avatars, upload("a.png", "image/png", b"same"))
            .await
            .unwrap();
        let b = store
            .upload(MediaFolder::Avatars, upload("a.png", "image/png", b"same"))
            .await
            .unwrap();
        assert_ne!(a.url, b.url);

        store.delete(&a.url).await.unwrap();
        let b_path = store.path_for_url(&b.url).unwrap();
        assert!(b_path.exists());
    }

    #[tokio::test]
    async fn test_extension_from_content_type() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let stored = store
            .upload(
                MediaFolder::Thumbnails,
                MediaUpload {
                    file_name: Some("thumbnail".to_string()),
                    content_type: Some("image/png".to_string()),
                    data: b"px".to_vec(),
                },
            )
            .await
            .unwrap();
        assert_eq!(stored.format, "png");
        assert_eq!(stored.resource_type, "image");
    }

    #[tokio::test]
    async fn test_delete_removes_file_and_empty_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let stored = store
            .upload(MediaFolder::CoverImages, upload("c.jpg", "image/jpeg", b"x"))
            .await
            .unwrap();
        let path = store.path_for_url(&stored.url).unwrap();
        assert!(path.exists());

        store.delete(&stored.url).await.unwrap();
        assert!(!path.exists());
        assert!(!temp_dir.path().join("covers").exists());
        assert!(temp_dir.path().exists());
    }

    #[tokio::test]
    async fn test_delete_missing_object_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        store
            .delete("http://localhost:8000/media/videos/ab/abcdef.mp4")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_rejects_foreign_and_traversal_urls() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        for url in [
            "https://cdn.example.com/media/videos/ab/abc.mp4",
            "http://localhost:8000/media/../secret/ab/abc",
            "http://localhost:8000/media/videos/../../etc/passwd",
            "http://localhost:8000/media/unknown/ab/abc.mp4",
            "http://localhost:8000/media/videos/ab/zz.mp4",
            "http://localhost:8000/media/videos/ab/..",
        ] {
            let result = store.delete(url).await;
            assert!(
                matches!(result, Err(ObjectStoreError::InvalidUrl(_))),
                "{url} should be rejected"
            );
        }
    }
}

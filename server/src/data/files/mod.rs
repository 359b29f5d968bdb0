//! Media object storage
//!
//! Uploaded media (videos, thumbnails, avatars, cover images) is written to an
//! `ObjectStore` and referenced from records by public URL.
//!
//! ## Storage Layout
//!
//! ```text
//! {base_path}/
//! └── {folder}/
//!     └── {key[0:2]}/
//!         └── {key}.{ext}
//! ```
//!
//! The filesystem backend's base path is served over HTTP at `/media`.

pub mod error;
pub mod filesystem;
pub mod storage;

pub use error::ObjectStoreError;
pub use filesystem::FilesystemObjectStore;
pub use storage::ObjectStore;

/// Top-level folder an upload is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFolder {
    Videos,
    Thumbnails,
    Avatars,
    CoverImages,
}

impl MediaFolder {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MediaFolder::Videos => "videos",
            MediaFolder::Thumbnails => "thumbnails",
            MediaFolder::Avatars => "avatars",
            MediaFolder::CoverImages => "covers",
        }
    }
}

/// A file received from a client
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl MediaUpload {
    /// Content type from the part header, else guessed from the file name
    pub fn effective_content_type(&self) -> Option<String> {
        self.content_type
            .clone()
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
            .or_else(|| {
                self.file_name
                    .as_deref()
                    .and_then(|name| mime_guess::from_path(name).first())
                    .map(|mime| mime.essence_str().to_string())
            })
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub url: String,
    /// Media duration in seconds, when the backend can probe it
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: String,
    /// `video`, `image` or `raw`
    pub resource_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_content_type_prefers_header() {
        let upload = MediaUpload {
            file_name: Some("clip.mp4".to_string()),
            content_type: Some("video/webm".to_string()),
            data: vec![],
        };
        assert_eq!(upload.effective_content_type().as_deref(), Some("video/webm"));
    }

    #[test]
    fn test_effective_content_type_guesses_from_name() {
        let upload = MediaUpload {
            file_name: Some("face.png".to_string()),
            content_type: Some("application/octet-stream".to_string()),
            data: vec![],
        };
        assert_eq!(upload.effective_content_type().as_deref(), Some("image/png"));

        let unknown = MediaUpload {
            file_name: None,
            content_type: None,
            data: vec![],
        };
        assert_eq!(unknown.effective_content_type(), None);
    }
}

//! Multipart form handling for media uploads

use std::collections::HashMap;

use axum::extract::Multipart;

use super::types::ApiError;
use crate::data::files::{MediaFolder, MediaUpload, StoredObject};
use crate::data::ObjectStore;
use crate::domain::DomainError;

/// Kind of media a file field must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    fn prefix(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Video => "video/",
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            MediaKind::Image => "an image",
            MediaKind::Video => "a video",
        }
    }
}

/// A parsed multipart body: text fields plus file parts
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, MediaUpload>,
}

impl UploadForm {
    /// Read every part. A part with a filename is a file; empty file parts are ignored.
    pub async fn parse(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Multipart error: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read {}: {}", name, e)))?;
                if data.is_empty() {
                    continue;
                }
                form.files.insert(
                    name,
                    MediaUpload {
                        file_name: Some(file_name),
                        content_type,
                        data: data.to_vec(),
                    },
                );
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read {}: {}", name, e)))?;
                form.fields.insert(name, value);
            }
        }

        tracing::trace!(
            fields = form.fields.len(),
            files = form.files.len(),
            "Multipart form parsed"
        );
        Ok(form)
    }

    /// Trimmed text field; blank values read as absent
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Remove a file part, checking that it carries the expected kind of media
    pub fn take_file(&mut self, name: &str, kind: MediaKind) -> Result<Option<MediaUpload>, ApiError> {
        let Some(upload) = self.files.remove(name) else {
            return Ok(None);
        };

        let matches = upload
            .effective_content_type()
            .is_some_and(|ct| ct.starts_with(kind.prefix()));
        if !matches {
            return Err(ApiError::bad_request(format!(
                "{} must be {} file",
                name,
                kind.noun()
            )));
        }
        Ok(Some(upload))
    }
}

/// Upload to the object store, surfacing failures as 500
pub async fn store(
    media: &dyn ObjectStore,
    folder: MediaFolder,
    upload: MediaUpload,
) -> Result<StoredObject, ApiError> {
    media
        .upload(folder, upload)
        .await
        .map_err(|e| DomainError::from(e).into())
}

/// Best-effort delete of a replaced or orphaned object
pub async fn discard(media: &dyn ObjectStore, url: &str) {
    if url.is_empty() {
        return;
    }
    if let Err(e) = media.delete(url).await {
        tracing::warn!(url, error = %e, "Failed to delete media object");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(name: &str, upload: MediaUpload) -> UploadForm {
        let mut form = UploadForm::default();
        form.files.insert(name.to_string(), upload);
        form
    }

    #[test]
    fn test_text_trims_and_hides_blank() {
        let mut form = UploadForm::default();
        form.fields.insert("title".into(), "  Hello  ".into());
        form.fields.insert("description".into(), "   ".into());
        assert_eq!(form.text("title"), Some("Hello"));
        assert_eq!(form.text("description"), None);
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn test_take_file_checks_kind() {
        let upload = MediaUpload {
            file_name: Some("clip.mp4".into()),
            content_type: None,
            data: vec![1, 2, 3],
        };

        let mut form = form_with("videoFile", upload.clone());
        assert!(form.take_file("videoFile", MediaKind::Video).unwrap().is_some());
        assert!(form.take_file("videoFile", MediaKind::Video).unwrap().is_none());

        let mut form = form_with("thumbnail", upload);
        let err = form.take_file("thumbnail", MediaKind::Image).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { ref message, .. } if message == "thumbnail must be an image file"));
    }
}

//! Object store trait definition

use async_trait::async_trait;

use super::error::ObjectStoreError;
use super::{MediaFolder, MediaUpload, StoredObject};

/// Trait for media storage backends
///
/// Records only keep the returned URL, so a backend must be able to delete by
/// that URL alone.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an upload
    ///
    /// # Arguments
    /// * `folder` - Folder the object is filed under
    /// * `upload` - File bytes with client-supplied name and content type
    ///
    /// # Returns
    /// Public URL plus whatever media metadata the backend could determine
    async fn upload(
        &self,
        folder: MediaFolder,
        upload: MediaUpload,
    ) -> Result<StoredObject, ObjectStoreError>;

    /// Delete an object by its public URL
    ///
    /// # Notes
    /// Does not fail if the object is already gone.
    async fn delete(&self, url: &str) -> Result<(), ObjectStoreError>;
}

//! Data storage layer
//!
//! - `sqlite` - Embedded database holding every record
//! - `files` - Media object store (uploads referenced by URL)
//! - `types` - Row and parameter types shared by repositories and services
//! - `traits` - Repository trait the rest of the server codes against
//! - `error` - Unified error type for the data layer

pub mod error;
pub mod files;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use files::{FilesystemObjectStore, ObjectStore, ObjectStoreError};
pub use sqlite::SqliteService;
pub use traits::TransactionalRepository;

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::storage::AppStorage;

/// Transactional database service
///
/// Services are stored as Arc so the repository and background tasks can
/// share them.
pub enum TransactionalService {
    /// SQLite backend (embedded)
    Sqlite(Arc<SqliteService>),
}

impl TransactionalService {
    pub async fn init(storage: &AppStorage) -> Result<Self, DataError> {
        let service = SqliteService::init(storage).await?;
        Ok(Self::Sqlite(Arc::new(service)))
    }

    /// Wrap an already-migrated pool (tests)
    #[cfg(test)]
    pub fn from_pool(pool: sqlx::SqlitePool) -> Self {
        Self::Sqlite(Arc::new(SqliteService::from_pool(pool)))
    }

    /// Run a WAL checkpoint
    pub async fn checkpoint(&self) -> Result<(), DataError> {
        match self {
            Self::Sqlite(s) => s.checkpoint().await.map_err(Into::into),
        }
    }

    /// Close the database connection gracefully
    pub async fn close(&self) {
        match self {
            Self::Sqlite(s) => s.close().await,
        }
    }

    /// Start the background checkpoint task
    pub fn start_checkpoint_task(&self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        match self {
            Self::Sqlite(s) => s.start_checkpoint_task(shutdown_rx),
        }
    }

    /// Get the repository trait object for data operations
    pub fn repository(&self) -> Arc<dyn TransactionalRepository> {
        match self {
            Self::Sqlite(s) => Arc::new(Arc::clone(s)),
        }
    }
}

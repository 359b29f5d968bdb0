//! Domain logic for VidHive
//!
//! - `authorization` - Ownership gate applied before every mutation
//! - `toggle` - Create-or-delete relations (likes, subscriptions)
//! - `pagination` - Page/limit windowing with total counts
//! - `views` - Aggregate read models
//! - `credentials` - Password verification and replacement
//! - `error` - Domain error taxonomy

pub mod authorization;
pub mod credentials;
pub mod error;
pub mod pagination;
pub mod toggle;
pub mod views;

pub use authorization::{Owned, authorize, require_owner};
pub use error::DomainError;
pub use pagination::{Page, PageRequest};
pub use toggle::{Toggled, toggle_like, toggle_subscription};

/// Repository over a fresh in-memory database
#[cfg(test)]
pub(crate) async fn test_repo() -> std::sync::Arc<dyn crate::data::TransactionalRepository> {
    let pool = crate::data::sqlite::test_pool().await;
    crate::data::TransactionalService::from_pool(pool).repository()
}

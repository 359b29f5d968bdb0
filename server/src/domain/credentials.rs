//! Credential checks over the identity store

use crate::data::TransactionalRepository;
use crate::utils::password::{hash_password, verify_password};

use super::error::DomainError;

/// Hash a plaintext password for storage
pub fn hash_credential(plaintext: &str) -> Result<String, DomainError> {
    hash_password(plaintext).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        DomainError::Internal("Failed to process password".to_string())
    })
}

/// Check a plaintext password against the user's stored hash.
///
/// An unknown user verifies as `false`.
pub async fn verify_credential(
    repo: &dyn TransactionalRepository,
    user_id: &str,
    plaintext: &str,
) -> Result<bool, DomainError> {
    Ok(repo
        .get_user(user_id)
        .await?
        .is_some_and(|user| verify_password(plaintext, &user.password_hash)))
}

/// Replace the user's password
pub async fn hash_and_set_credential(
    repo: &dyn TransactionalRepository,
    user_id: &str,
    plaintext: &str,
) -> Result<(), DomainError> {
    let hash = hash_credential(plaintext)?;
    if !repo.set_password_hash(user_id, &hash).await? {
        return Err(DomainError::not_found("User not found"));
    }
    tracing::debug!(user_id, "Password updated");
    Ok(())
}

/// Verify the current password, then store the new one
pub async fn change_password(
    repo: &dyn TransactionalRepository,
    user_id: &str,
    current: &str,
    new: &str,
) -> Result<(), DomainError> {
    if !verify_credential(repo, user_id, current).await? {
        return Err(DomainError::unauthenticated("Current password is incorrect"));
    }
    hash_and_set_credential(repo, user_id, new).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::user::tests::new_user;
    use crate::domain::test_repo;

    #[tokio::test]
    async fn test_set_then_verify() {
        let repo = test_repo().await;
        let user = repo.create_user(&new_user("alice")).await.unwrap();

        hash_and_set_credential(repo.as_ref(), &user.id, "hunter22")
            .await
            .unwrap();
        assert!(verify_credential(repo.as_ref(), &user.id, "hunter22").await.unwrap());
        assert!(!verify_credential(repo.as_ref(), &user.id, "hunter23").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let repo = test_repo().await;
        assert!(!verify_credential(repo.as_ref(), "missing", "x").await.unwrap());

        let err = hash_and_set_credential(repo.as_ref(), "missing", "x")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_change_password_requires_current() {
        let repo = test_repo().await;
        let user = repo.create_user(&new_user("bob")).await.unwrap();
        hash_and_set_credential(repo.as_ref(), &user.id, "old-pass")
            .await
            .unwrap();

        let err = change_password(repo.as_ref(), &user.id, "nope", "new-pass")
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::Unauthenticated(ref m) if m == "Current password is incorrect")
        );

        change_password(repo.as_ref(), &user.id, "old-pass", "new-pass")
            .await
            .unwrap();
        assert!(verify_credential(repo.as_ref(), &user.id, "new-pass").await.unwrap());
    }
}

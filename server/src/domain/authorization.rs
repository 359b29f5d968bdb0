//! Ownership gate for mutations
//!
//! Every mutation of a comment, tweet, video or playlist goes through
//! `require_owner`: a missing record is NotFound, a record owned by someone
//! else is Forbidden. Only then may the caller mutate.

use crate::data::types::{CommentRow, PlaylistRow, TweetRow, VideoRow};

use super::error::DomainError;

/// A record with a single owning user
pub trait Owned {
    /// Lowercase noun used in messages ("video", "comment", ...)
    const KIND: &'static str;

    fn owner_id(&self) -> &str;
}

impl Owned for VideoRow {
    const KIND: &'static str = "video";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for CommentRow {
    const KIND: &'static str = "comment";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for TweetRow {
    const KIND: &'static str = "tweet";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for PlaylistRow {
    const KIND: &'static str = "playlist";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

/// Allow iff the caller owns the record
pub fn authorize<T: Owned>(caller_id: &str, record: &T, action: &str) -> Result<(), DomainError> {
    if record.owner_id() == caller_id {
        Ok(())
    } else {
        Err(DomainError::forbidden(format!(
            "You are not authorized to {} this {}",
            action,
            T::KIND
        )))
    }
}

/// Existence check followed by the ownership check
pub fn require_owner<T: Owned>(
    caller_id: &str,
    record: Option<T>,
    action: &str,
) -> Result<T, DomainError> {
    let record = record.ok_or_else(|| DomainError::not_found(not_found_message::<T>()))?;
    authorize(caller_id, &record, action)?;
    Ok(record)
}

/// "Video not found", "Comment not found", ...
pub fn not_found_message<T: Owned>() -> String {
    let mut chars = T::KIND.chars();
    match chars.next() {
        Some(first) => format!("{}{} not found", first.to_ascii_uppercase(), chars.as_str()),
        None => "Not found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet(owner: &str) -> TweetRow {
        TweetRow {
            id: "t1".to_string(),
            owner_id: owner.to_string(),
            content: "hello".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_authorize_owner_allowed() {
        assert!(authorize("alice", &tweet("alice"), "update").is_ok());
    }

    #[test]
    fn test_authorize_other_user_forbidden() {
        let err = authorize("bob", &tweet("alice"), "delete").unwrap_err();
        assert!(
            matches!(err, DomainError::Forbidden(ref m) if m == "You are not authorized to delete this tweet")
        );
    }

    #[test]
    fn test_require_owner_missing_is_not_found_for_anyone() {
        let err = require_owner::<TweetRow>("alice", None, "update").unwrap_err();
        assert!(matches!(err, DomainError::NotFound(ref m) if m == "Tweet not found"));
    }

    #[test]
    fn test_require_owner_returns_record() {
        let row = require_owner("alice", Some(tweet("alice")), "update").unwrap();
        assert_eq!(row.id, "t1");
    }

    #[test]
    fn test_not_found_messages() {
        assert_eq!(not_found_message::<VideoRow>(), "Video not found");
        assert_eq!(not_found_message::<PlaylistRow>(), "Playlist not found");
    }
}

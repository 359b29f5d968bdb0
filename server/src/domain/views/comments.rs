//! Paginated comments of one video

use async_trait::async_trait;

use crate::data::TransactionalRepository;
use crate::data::types::CommentWithOwner;
use crate::domain::error::DomainError;
use crate::domain::pagination::{Page, PageRequest, Window, WindowedQuery, paginate};

struct CommentsQuery<'a> {
    repo: &'a dyn TransactionalRepository,
    video_id: &'a str,
}

#[async_trait]
impl WindowedQuery for CommentsQuery<'_> {
    type Item = CommentWithOwner;

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.repo.count_comments_for_video(self.video_id).await?)
    }

    async fn fetch(&self, window: Window) -> Result<Vec<CommentWithOwner>, DomainError> {
        Ok(self
            .repo
            .list_comments_for_video(self.video_id, window.offset, window.limit)
            .await?)
    }
}

/// Newest first. Comments by users that no longer resolve are kept with no owner.
pub async fn video_comments(
    repo: &dyn TransactionalRepository,
    video_id: &str,
    request: PageRequest,
) -> Result<Page<CommentWithOwner>, DomainError> {
    paginate(&CommentsQuery { repo, video_id }, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::user::tests::new_user;
    use crate::domain::test_repo;

    #[tokio::test]
    async fn test_comments_keep_unresolved_owner() {
        let repo = test_repo().await;
        let alice = repo.create_user(&new_user("alice")).await.unwrap();
        repo.create_comment("v1", &alice.id, "nice").await.unwrap();
        repo.create_comment("v1", "ghost", "boo").await.unwrap();
        repo.create_comment("v2", &alice.id, "elsewhere").await.unwrap();

        let page = video_comments(repo.as_ref(), "v1", PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.items.len(), 2);

        let orphan = page
            .items
            .iter()
            .find(|c| c.comment.content == "boo")
            .unwrap();
        assert!(orphan.owner.is_none());

        let owned = page
            .items
            .iter()
            .find(|c| c.comment.content == "nice")
            .unwrap();
        assert_eq!(owned.owner.as_ref().unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_page_far_beyond_end_is_empty() {
        let repo = test_repo().await;
        let alice = repo.create_user(&new_user("alice")).await.unwrap();
        for text in ["one", "two", "three"] {
            repo.create_comment("v1", &alice.id, text).await.unwrap();
        }

        let request = PageRequest::parse(Some("1000000000000000000"), Some("10"));
        let page = video_comments(repo.as_ref(), "v1", request).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.page, 1_000_000_000_000_000_000);
        assert_eq!(page.total_items, 3);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_empty_comments_page_is_ok() {
        let repo = test_repo().await;
        let page = video_comments(repo.as_ref(), "nothing", PageRequest::default())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
    }
}

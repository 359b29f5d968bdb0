//! Video feed: filtered, sorted, paginated published catalogue

use async_trait::async_trait;

use crate::data::TransactionalRepository;
use crate::data::types::{
    SortDirection, VideoFeedFilter, VideoSort, VideoSortField, VideoWithOwner,
};
use crate::domain::error::DomainError;
use crate::domain::pagination::{Page, PageRequest, Window, WindowedQuery, paginate};

/// Feed query; count and fetch share one filter
struct FeedQuery<'a> {
    repo: &'a dyn TransactionalRepository,
    filter: &'a VideoFeedFilter,
    sort: VideoSort,
}

#[async_trait]
impl WindowedQuery for FeedQuery<'_> {
    type Item = VideoWithOwner;

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.repo.count_video_feed(self.filter).await?)
    }

    async fn fetch(&self, window: Window) -> Result<Vec<VideoWithOwner>, DomainError> {
        Ok(self
            .repo
            .list_video_feed(self.filter, self.sort, window.offset, window.limit)
            .await?)
    }
}

/// Resolve `sortBy`/`sortType`. Absent `sortBy` means `createdAt`.
pub fn parse_sort(sort_by: Option<&str>, sort_type: Option<&str>) -> Result<VideoSort, DomainError> {
    let field = match sort_by.filter(|s| !s.is_empty()) {
        None => VideoSortField::default(),
        Some(key) => VideoSortField::parse(key).ok_or_else(|| {
            DomainError::validation(format!(
                "Invalid sortBy: must be one of {}",
                VideoSortField::ALLOWED.join(", ")
            ))
        })?,
    };
    Ok(VideoSort {
        field,
        direction: SortDirection::parse(sort_type),
    })
}

/// One page of the feed. Videos whose uploader cannot be resolved never appear.
///
/// An empty page is NotFound.
pub async fn video_feed(
    repo: &dyn TransactionalRepository,
    filter: &VideoFeedFilter,
    sort: VideoSort,
    request: PageRequest,
) -> Result<Page<VideoWithOwner>, DomainError> {
    let query = FeedQuery { repo, filter, sort };
    let page = paginate(&query, request).await?;

    if page.items.is_empty() {
        return Err(DomainError::not_found("No videos found for the given criteria"));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::user::tests::new_user;
    use crate::data::sqlite::repositories::video::tests::new_video;
    use crate::domain::test_repo;

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort(None, None).unwrap(), VideoSort::default());
        let sort = parse_sort(Some("views"), Some("asc")).unwrap();
        assert_eq!(sort.field, VideoSortField::Views);
        assert_eq!(sort.direction, SortDirection::Asc);

        let err = parse_sort(Some("owner"), None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_feed_drops_orphaned_videos() {
        let repo = test_repo().await;
        let owner = repo.create_user(&new_user("alice")).await.unwrap();
        repo.create_video(&new_video(&owner.id, "kept")).await.unwrap();
        repo.create_video(&new_video("ghost", "orphan")).await.unwrap();

        let page = video_feed(
            repo.as_ref(),
            &VideoFeedFilter::default(),
            VideoSort::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].video.title, "kept");
        assert_eq!(
            page.items[0].owner.as_ref().map(|o| o.username.as_str()),
            Some("alice")
        );
    }

    #[tokio::test]
    async fn test_feed_pages_and_empty_is_not_found() {
        let repo = test_repo().await;
        let owner = repo.create_user(&new_user("alice")).await.unwrap();
        for i in 0..3 {
            repo.create_video(&new_video(&owner.id, &format!("v{i}")))
                .await
                .unwrap();
        }

        let request = PageRequest { page: 2, limit: 2 };
        let page = video_feed(
            repo.as_ref(),
            &VideoFeedFilter::default(),
            VideoSort::default(),
            request,
        )
        .await
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_prev_page);
        assert!(!page.has_next_page);
        // Newest first, so the oldest upload lands alone on page two
        assert_eq!(page.items[0].video.title, "v0");

        let filter = VideoFeedFilter {
            category: Some("nothing-here".to_string()),
            ..Default::default()
        };
        let err = video_feed(repo.as_ref(), &filter, VideoSort::default(), PageRequest::default())
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::NotFound(ref m) if m == "No videos found for the given criteria")
        );
    }
}

//! Single-video, per-user and playlist read views

use std::collections::HashMap;

use crate::data::TransactionalRepository;
use crate::data::types::{PlaylistRow, UserSummary, VideoRow, VideoWithOwner};
use crate::domain::error::DomainError;

/// Video with its uploader. An unresolvable uploader hides the video.
pub async fn video_detail(
    repo: &dyn TransactionalRepository,
    video_id: &str,
) -> Result<VideoWithOwner, DomainError> {
    repo.get_video_with_owner(video_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Video not found"))
}

/// Count a view and, for a signed-in viewer, append to their watch history
pub async fn record_view(
    repo: &dyn TransactionalRepository,
    video_id: &str,
    viewer_id: Option<&str>,
) -> Result<(), DomainError> {
    repo.increment_video_views(video_id).await?;
    if let Some(viewer) = viewer_id {
        let appended = repo.append_watch_history(viewer, video_id).await?;
        tracing::trace!(viewer, video_id, appended, "Watch history updated");
    }
    Ok(())
}

/// A channel's own uploads, newest first, each with its owner resolved
pub async fn owner_videos(
    repo: &dyn TransactionalRepository,
    owner_id: &str,
) -> Result<Vec<VideoWithOwner>, DomainError> {
    let videos = repo.list_videos_by_owner(owner_id).await?;
    let owner = repo
        .get_user_summaries(&[owner_id.to_string()])
        .await?
        .into_iter()
        .next();

    Ok(videos
        .into_iter()
        .map(|video| VideoWithOwner {
            video,
            owner: owner.clone(),
        })
        .collect())
}

/// A playlist with its videos resolved in stored order
#[derive(Debug, Clone)]
pub struct PlaylistWithVideos {
    pub playlist: PlaylistRow,
    pub videos: Vec<VideoRow>,
}

/// Every playlist of a user, videos populated. Deleted videos are skipped.
pub async fn user_playlists(
    repo: &dyn TransactionalRepository,
    owner_id: &str,
) -> Result<Vec<PlaylistWithVideos>, DomainError> {
    let playlists = repo.list_playlists_by_owner(owner_id).await?;

    let mut ids: Vec<String> = playlists
        .iter()
        .flat_map(|p| p.video_ids.iter().cloned())
        .collect();
    ids.sort();
    ids.dedup();

    let videos: HashMap<String, VideoRow> = if ids.is_empty() {
        HashMap::new()
    } else {
        repo.get_videos_by_ids(&ids)
            .await?
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect()
    };

    Ok(playlists
        .into_iter()
        .map(|playlist| {
            let videos = playlist
                .video_ids
                .iter()
                .filter_map(|id| videos.get(id).cloned())
                .collect();
            PlaylistWithVideos { playlist, videos }
        })
        .collect())
}

/// Resolve owners for a batch of rows keyed by owner id
pub async fn owner_map<'a>(
    repo: &dyn TransactionalRepository,
    owner_ids: impl IntoIterator<Item = &'a str>,
) -> Result<HashMap<String, UserSummary>, DomainError> {
    let mut ids: Vec<String> = owner_ids.into_iter().map(str::to_string).collect();
    ids.sort();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(repo
        .get_user_summaries(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::user::tests::new_user;
    use crate::data::sqlite::repositories::video::tests::new_video;
    use crate::domain::test_repo;

    #[tokio::test]
    async fn test_video_detail_hides_orphans() {
        let repo = test_repo().await;
        let owner = repo.create_user(&new_user("alice")).await.unwrap();
        let video = repo.create_video(&new_video(&owner.id, "a")).await.unwrap();
        let orphan = repo.create_video(&new_video("ghost", "b")).await.unwrap();

        let detail = video_detail(repo.as_ref(), &video.id).await.unwrap();
        assert_eq!(detail.owner.unwrap().username, "alice");

        for id in [orphan.id.as_str(), "missing"] {
            let err = video_detail(repo.as_ref(), id).await.unwrap_err();
            assert!(matches!(err, DomainError::NotFound(ref m) if m == "Video not found"));
        }
    }

    #[tokio::test]
    async fn test_record_view() {
        let repo = test_repo().await;
        let viewer = repo.create_user(&new_user("viewer")).await.unwrap();
        let video = repo.create_video(&new_video(&viewer.id, "a")).await.unwrap();

        record_view(repo.as_ref(), &video.id, None).await.unwrap();
        record_view(repo.as_ref(), &video.id, Some(viewer.id.as_str())).await.unwrap();
        record_view(repo.as_ref(), &video.id, Some(viewer.id.as_str())).await.unwrap();

        let stored = repo.get_video(&video.id).await.unwrap().unwrap();
        assert_eq!(stored.views, 3);
        assert_eq!(
            repo.get_watch_history_ids(&viewer.id).await.unwrap(),
            vec![video.id.clone()]
        );
    }

    #[tokio::test]
    async fn test_owner_videos() {
        let repo = test_repo().await;
        let owner = repo.create_user(&new_user("alice")).await.unwrap();
        repo.create_video(&new_video(&owner.id, "one")).await.unwrap();
        repo.create_video(&new_video(&owner.id, "two")).await.unwrap();
        repo.create_video(&new_video("someone-else", "three")).await.unwrap();

        let videos = owner_videos(repo.as_ref(), &owner.id).await.unwrap();
        assert_eq!(videos.len(), 2);
        assert!(videos.iter().all(|v| v.owner.as_ref().unwrap().id == owner.id));
    }

    #[tokio::test]
    async fn test_user_playlists_populate_in_order() {
        let repo = test_repo().await;
        let owner = repo.create_user(&new_user("alice")).await.unwrap();
        let a = repo.create_video(&new_video(&owner.id, "a")).await.unwrap();
        let b = repo.create_video(&new_video(&owner.id, "b")).await.unwrap();
        let c = repo.create_video(&new_video(&owner.id, "c")).await.unwrap();

        let list = repo.create_playlist(&owner.id, "mix", "").await.unwrap();
        for v in [&c, &a, &b] {
            repo.add_playlist_video(&list.id, &v.id).await.unwrap();
        }
        repo.delete_video(&a.id).await.unwrap();
        repo.create_playlist(&owner.id, "empty", "").await.unwrap();

        let playlists = user_playlists(repo.as_ref(), &owner.id).await.unwrap();
        assert_eq!(playlists.len(), 2);

        let mix = playlists.iter().find(|p| p.playlist.name == "mix").unwrap();
        let titles: Vec<&str> = mix.videos.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b"]);

        let empty = playlists.iter().find(|p| p.playlist.name == "empty").unwrap();
        assert!(empty.videos.is_empty());
    }

    #[tokio::test]
    async fn test_owner_map_skips_unknown() {
        let repo = test_repo().await;
        let alice = repo.create_user(&new_user("alice")).await.unwrap();

        let owners = owner_map(repo.as_ref(), [alice.id.as_str(), "ghost", alice.id.as_str()])
            .await
            .unwrap();
        assert_eq!(owners.len(), 1);
        assert!(owners.contains_key(&alice.id));
    }
}

//! Watch history resolved into videos

use std::collections::HashMap;

use crate::data::TransactionalRepository;
use crate::data::types::{UserSummary, VideoRow};
use crate::domain::error::DomainError;

use super::library::owner_map;

/// A watched video with its owner collapsed to one object (or none)
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub video: VideoRow,
    pub owner: Option<UserSummary>,
}

/// The caller's history in stored order. Videos that no longer exist are skipped.
pub async fn watch_history(
    repo: &dyn TransactionalRepository,
    user_id: &str,
) -> Result<Vec<HistoryEntry>, DomainError> {
    let ids = repo.get_watch_history_ids(user_id).await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut videos: HashMap<String, VideoRow> = repo
        .get_videos_by_ids(&ids)
        .await?
        .into_iter()
        .map(|v| (v.id.clone(), v))
        .collect();

    let owners = owner_map(repo, videos.values().map(|v| v.owner_id.as_str())).await?;

    Ok(ids
        .iter()
        .filter_map(|id| videos.remove(id))
        .map(|video| {
            let owner = owners.get(&video.owner_id).cloned();
            HistoryEntry { video, owner }
        })
        .collect())
}

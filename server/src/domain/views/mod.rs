//! Aggregate read views
//!
//! Multi-record joins with derived fields. Each view reads through
//! `TransactionalRepository` only.
//!
//! | View | Join semantics |
//! |------|----------------|
//! | feed, video detail | uploader inner-joined; orphans dropped |
//! | comments | owner left-joined; orphans kept with no owner |
//! | watch history | owner collapsed to one object or none |

pub mod channel;
pub mod comments;
pub mod feed;
pub mod history;
pub mod library;

pub use channel::{ChannelProfile, ChannelStats, channel_profile, channel_stats};
pub use comments::video_comments;
pub use feed::{parse_sort, video_feed};
pub use history::{HistoryEntry, watch_history};
pub use library::{
    PlaylistWithVideos, owner_map, owner_videos, record_view, user_playlists, video_detail,
};

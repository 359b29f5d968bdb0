//! Shared data types for the storage layer
//!
//! Row types mirror stored records. Param types carry inputs for writes and
//! filtered reads.

mod params;
mod records;

pub use params::{
    NewUser, NewVideo, SortDirection, VideoFeedFilter, VideoPatch, VideoSort, VideoSortField,
};
pub use records::{
    CommentRow, CommentWithOwner, LikeRow, LikeTarget, LikedVideoRow, PlaylistRow,
    SubscriptionRow, SubscriptionWithUser, TweetRow, TweetWithOwner, UserRow, UserSummary,
    VideoRow, VideoWithOwner,
};

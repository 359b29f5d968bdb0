//! SQLite repositories
//!
//! Free functions over a `SqlitePool`, one module per record kind. Row and
//! param types live in `crate::data::types`.

pub mod comment;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

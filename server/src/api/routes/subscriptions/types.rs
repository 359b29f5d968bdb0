//! Subscription API types

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::types::timestamp;
use crate::data::types::{SubscriptionWithUser, UserSummary};

/// `{_id, username, email, avatar}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar: String,
}

impl From<UserSummary> for ContactDto {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
        }
    }
}

/// Subscription of a channel with the subscriber populated
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberEntryDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub subscriber: Option<ContactDto>,
    pub channel: String,
    pub created_at: DateTime<Utc>,
}

impl From<SubscriptionWithUser> for SubscriberEntryDto {
    fn from(row: SubscriptionWithUser) -> Self {
        Self {
            id: row.subscription.id,
            subscriber: row.user.map(ContactDto::from),
            channel: row.subscription.channel_id,
            created_at: timestamp(row.subscription.created_at),
        }
    }
}

/// Subscription of a user with the channel populated
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEntryDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub subscriber: String,
    pub channel: Option<ContactDto>,
    pub created_at: DateTime<Utc>,
}

impl From<SubscriptionWithUser> for ChannelEntryDto {
    fn from(row: SubscriptionWithUser) -> Self {
        Self {
            id: row.subscription.id,
            subscriber: row.subscription.subscriber_id,
            channel: row.user.map(ContactDto::from),
            created_at: timestamp(row.subscription.created_at),
        }
    }
}

//! Per-request authentication context

use crate::data::types::UserRow;

/// The signed-in caller, loaded fresh from the identity store
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: UserRow,
}

impl AuthContext {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// What the auth middleware concluded about a request
///
/// Inserted into request extensions for every `/api/v1` request. Extractors
/// decide whether a given outcome is acceptable for their route.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Authenticated(AuthContext),
    /// No token was presented
    Anonymous,
    /// A token was presented but rejected; carries the 401 message
    Invalid(String),
    /// The identity store could not be reached
    Unavailable,
}

impl AuthOutcome {
    pub fn into_context(self) -> Option<AuthContext> {
        match self {
            Self::Authenticated(ctx) => Some(ctx),
            _ => None,
        }
    }
}

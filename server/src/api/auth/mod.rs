//! Authentication module
//!
//! - `jwt` - access/refresh token claims, signing and validation
//! - `manager` - signing keys, token issuance and session cookies
//! - `middleware` - resolves the caller once per request
//! - `extractors` - `Auth` (required) and `MaybeAuth` (optional)

mod context;
mod extractors;
pub mod jwt;
mod manager;
pub mod middleware;

pub use context::{AuthContext, AuthOutcome};
pub use extractors::{Auth, MaybeAuth};
pub use jwt::JwtError;
pub use manager::{AuthManager, TokenPair};
pub use middleware::{AuthState, authenticate};

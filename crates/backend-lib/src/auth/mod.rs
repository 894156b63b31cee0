// ============================
// backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

pub use middleware::{require_auth, AuthUser, ACCESS_COOKIE, REFRESH_COOKIE};
pub use password::{hash_password, hash_password_secure, verify_password};
pub use service::{IssuedSession, SessionService};
pub use token::{AccessClaims, RefreshClaims, TokenError, TokenIssuer};

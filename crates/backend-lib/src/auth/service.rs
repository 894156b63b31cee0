// ============================
// backend-lib/src/auth/service.rs
// ============================
//! Identity lifecycle: sign-up, sign-in, refresh, sign-out.
//!
//! The only place where store and token issuer are combined in a
//! specific order. The stored refresh token is the revocation
//! mechanism: signing alone cannot be invalidated early, but the
//! server-side equality check can, by overwriting the stored value.
use std::sync::Arc;

use recipebox_common::UserView;

use crate::auth::password;
use crate::auth::token::{TokenError, TokenIssuer};
use crate::error::AppError;
use crate::store::UserStore;

/// Token pair plus the public user view, as returned by sign-up and sign-in.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserView,
}

pub struct SessionService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenIssuer>,
}

impl SessionService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenIssuer>) -> Self {
        Self { users, tokens }
    }

    /// Create an account and open a session for it.
    pub async fn sign_up(&self, email: &str, password: String) -> Result<IssuedSession, AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let hash = hash_password_blocking(password).await?;
        let user = self.users.create(email, &hash).await?;

        let access_token = self.tokens.issue_access(user.id, &user.email)?;
        let refresh_token = self.tokens.issue_refresh(user.id)?;
        self.users
            .set_refresh_token(user.id, Some(&refresh_token))
            .await?;

        Ok(IssuedSession {
            access_token,
            refresh_token,
            user: UserView {
                id: user.id,
                email: user.email,
            },
        })
    }

    /// Open a session for an existing account. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub async fn sign_in(&self, email: &str, password: String) -> Result<IssuedSession, AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password_blocking(user.password_hash.clone(), password).await? {
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self.tokens.issue_access(user.id, &user.email)?;
        let refresh_token = self.tokens.issue_refresh(user.id)?;
        // overwriting revokes any refresh token issued earlier
        self.users
            .set_refresh_token(user.id, Some(&refresh_token))
            .await?;

        Ok(IssuedSession {
            access_token,
            refresh_token,
            user: UserView {
                id: user.id,
                email: user.email,
            },
        })
    }

    /// Exchange a refresh token for a new access token. The refresh
    /// token itself is not rotated.
    pub async fn refresh_access_token(
        &self,
        presented: Option<String>,
    ) -> Result<String, AppError> {
        let presented = presented.ok_or(AppError::MissingToken)?;

        let claims = self.tokens.verify_refresh(&presented).map_err(|e| match e {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::Malformed => AppError::InvalidRefreshToken,
        })?;

        let Some(user) = self.users.find_by_id(claims.sub).await? else {
            return Err(AppError::InvalidRefreshToken);
        };

        // must equal the stored value byte for byte; a later sign-in
        // replaces it and strands every older token
        if user.refresh_token.as_deref() != Some(presented.as_str()) {
            return Err(AppError::InvalidRefreshToken);
        }

        Ok(self.tokens.issue_access(user.id, &user.email)?)
    }

    /// Revoke the stored refresh token. Idempotent; a second call is a
    /// harmless no-op.
    pub async fn sign_out(&self, user_id: i64) -> Result<(), AppError> {
        self.users.set_refresh_token(user_id, None).await
    }
}

// scrypt is deliberately slow, so keep it off the async workers

async fn hash_password_blocking(mut plain: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || password::hash_password_secure(&mut plain))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(e.to_string()))
}

async fn verify_password_blocking(hash: String, plain: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || password::verify_password(&hash, &plain))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

// ============================
// backend-lib/src/auth/middleware.rs
// ============================
//! Access-token guard for protected routes.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::token::TokenError;
use crate::error::AppError;
use crate::AppState;

/// Cookie names shared by the gate and the auth handlers.
pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Identity resolved by the auth gate, inserted into request
/// extensions for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

/// Middleware guarding protected routes. Resolves a bearer access token
/// (cookie first, then `Authorization` header) to an [`AuthUser`].
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(ACCESS_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| bearer_token(request.headers()));

    let Some(token) = token else {
        return Err(AppError::AuthRequired);
    };

    let claims = state.tokens.verify_access(&token).map_err(|e| match e {
        TokenError::Expired => AppError::TokenExpired,
        TokenError::Malformed => AppError::InvalidToken,
    })?;

    // the user may have been removed since the token was signed
    let Some(user) = state.users.find_by_id(claims.sub).await? else {
        return Err(AppError::InvalidToken);
    };

    request.extensions_mut().insert(AuthUser {
        user_id: user.id,
        email: user.email,
    });

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert!(bearer_token(&headers).is_none());
    }
}

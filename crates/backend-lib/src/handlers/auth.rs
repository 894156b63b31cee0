// ============================
// backend-lib/src/handlers/auth.rs
// ============================
//! Identity endpoints: sign-up, sign-in, refresh, sign-out.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use recipebox_common::{
    AuthResponse, MessageResponse, RefreshTokenRequest, RefreshTokenResponse, SignInRequest,
    SignUpRequest,
};

use crate::auth::middleware::{AuthUser, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::auth::service::IssuedSession;
use crate::error::AppError;
use crate::AppState;

/// Cookie lifetime for the token pair.
const COOKIE_MAX_AGE: time::Duration = time::Duration::days(7);

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(COOKIE_MAX_AGE)
        .build()
}

fn with_session_cookies(jar: CookieJar, session: &IssuedSession, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_COOKIE,
        session.access_token.clone(),
        secure,
    ))
    .add(session_cookie(
        REFRESH_COOKIE,
        session.refresh_token.clone(),
        secure,
    ))
}

/// `POST /signup`
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.sessions.sign_up(&req.email, req.password).await?;
    let jar = with_session_cookies(jar, &session, state.settings.secure_cookies);

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user: session.user,
        }),
    ))
}

/// `POST /signin`
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.sessions.sign_in(&req.email, req.password).await?;
    let jar = with_session_cookies(jar, &session, state.settings.secure_cookies);

    Ok((
        StatusCode::OK,
        jar,
        Json(AuthResponse {
            message: "Login successful".to_string(),
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user: session.user,
        }),
    ))
}

/// `POST /refresh-token`
///
/// The token is the credential here: taken from the `refreshToken`
/// cookie, falling back to the JSON body. The body is optional, so its
/// rejection is swallowed rather than bubbled.
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let presented = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| body.ok().and_then(|Json(req)| req.refresh_token));

    let access_token = state.sessions.refresh_access_token(presented).await?;
    let jar = jar.add(session_cookie(
        ACCESS_COOKIE,
        access_token.clone(),
        state.settings.secure_cookies,
    ));

    Ok((StatusCode::OK, jar, Json(RefreshTokenResponse { access_token })))
}

/// `POST /signout` (protected by [`crate::auth::require_auth`])
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    state.sessions.sign_out(user.user_id).await?;

    let jar = jar
        .remove(Cookie::build((ACCESS_COOKIE, "")).path("/"))
        .remove(Cookie::build((REFRESH_COOKIE, "")).path("/"));

    Ok((
        StatusCode::OK,
        jar,
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

// ============================
// backend-lib/src/router.rs
// ============================
//! HTTP router assembly.
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use recipebox_common::MessageResponse;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::require_auth;
use crate::handlers;
use crate::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // only sign-out sits behind the auth gate
    let protected = Router::new()
        .route("/signout", post(handlers::auth::sign_out))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/signup", post(handlers::auth::sign_up))
        .route("/signin", post(handlers::auth::sign_in))
        .route("/refresh-token", post(handlers::auth::refresh_token))
        .merge(protected)
        .route("/favorites", post(handlers::favorites::add))
        .route("/favorites/{user_id}", get(handlers::favorites::list))
        .route(
            "/favorites/{user_id}/{recipe_id}",
            delete(handlers::favorites::remove),
        )
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Server is healthy".to_string(),
    })
}

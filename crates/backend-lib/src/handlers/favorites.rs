// ============================
// backend-lib/src/handlers/favorites.rs
// ============================
//! Favorite-recipe endpoints.
//!
//! These routes take a caller-supplied user id and are not wired
//! through the auth gate, mirroring the observed routing.
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use recipebox_common::{AddFavoriteRequest, FavoriteResponse, FavoritesResponse};

use crate::error::AppError;
use crate::AppState;

/// `GET /favorites/{userId}`
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<FavoritesResponse>, AppError> {
    let data = state.favorites.list(&user_id).await?;
    Ok(Json(FavoritesResponse {
        message: "Favorites fetched successfully".to_string(),
        data,
    }))
}

/// `POST /favorites`
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddFavoriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let favorite = state.favorites.add(&req).await?;
    Ok((
        StatusCode::CREATED,
        Json(FavoriteResponse {
            message: "Recipe added to favorites successfully".to_string(),
            data: favorite,
        }),
    ))
}

/// `DELETE /favorites/{userId}/{recipeId}`
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path((user_id, recipe_id)): Path<(String, i64)>,
) -> Result<Json<FavoriteResponse>, AppError> {
    let Some(removed) = state.favorites.remove(&user_id, recipe_id).await? else {
        return Err(AppError::FavoriteNotFound);
    };

    Ok(Json(FavoriteResponse {
        message: "Recipe removed from favorites successfully".to_string(),
        data: removed,
    }))
}

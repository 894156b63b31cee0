// ============================
// backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the recipebox REST server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod store;

use std::sync::Arc;

use crate::auth::{SessionService, TokenIssuer};
use crate::config::Settings;
use crate::store::{FavoriteStore, FlatFileStore, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Session service (sign-up / sign-in / refresh / sign-out)
    pub sessions: Arc<SessionService>,
    /// Token issuer
    pub tokens: Arc<TokenIssuer>,
    /// Credential store
    pub users: Arc<dyn UserStore>,
    /// Favorite-recipe store
    pub favorites: Arc<dyn FavoriteStore>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state around a store handle. The store is
    /// passed in explicitly so tests can point it at a temporary directory.
    pub fn new(store: Arc<FlatFileStore>, settings: Settings) -> Self {
        let tokens = Arc::new(TokenIssuer::new(
            &settings.access_token_secret,
            &settings.refresh_token_secret,
            settings.access_token_ttl_secs,
            settings.refresh_token_ttl_secs,
        ));
        let users: Arc<dyn UserStore> = store.clone();
        let favorites: Arc<dyn FavoriteStore> = store;
        let sessions = Arc::new(SessionService::new(users.clone(), tokens.clone()));

        Self {
            sessions,
            tokens,
            users,
            favorites,
            settings: Arc::new(settings),
        }
    }
}

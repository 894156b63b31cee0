// ============================
// backend-lib/src/store.rs
// ============================
//! Durable user and favorite records with a flat-file implementation.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipebox_common::{AddFavoriteRequest, Favorite};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicI64, Ordering},
};
use tokio::{fs as tokio_fs, sync::RwLock};

use crate::error::AppError;

const USERS_FILE: &str = "users.json";
const FAVORITES_FILE: &str = "favorites.json";

/// A stored user record. The refresh token is the single live value for
/// this user; overwriting it revokes whatever was there before.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trait for credential storage backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by email (case-sensitive, as stored)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Look up a user by id
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Create a user. Fails if the email is already present.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    /// Unconditionally overwrite the stored refresh token.
    /// `None` revokes; a missing user is a no-op.
    async fn set_refresh_token(&self, id: i64, token: Option<&str>) -> Result<(), AppError>;
}

/// Trait for favorite-recipe storage backends
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// All favorites recorded for a user
    async fn list(&self, user_id: &str) -> Result<Vec<Favorite>, AppError>;

    /// Record a favorite and return it with its assigned id
    async fn add(&self, new: &AddFavoriteRequest) -> Result<Favorite, AppError>;

    /// Remove a favorite by (user, recipe); `None` when nothing matched
    async fn remove(&self, user_id: &str, recipe_id: i64)
        -> Result<Option<Favorite>, AppError>;
}

/// Flat-file implementation of both stores. Records live in memory behind
/// RwLocks and are rewritten to JSON files while the write lock is held,
/// so readers never observe a torn update.
pub struct FlatFileStore {
    root: PathBuf,
    users: RwLock<HashMap<i64, User>>,
    favorites: RwLock<Vec<Favorite>>,
    next_user_id: AtomicI64,
    next_favorite_id: AtomicI64,
}

impl FlatFileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let users: Vec<User> = load_rows(&root.join(USERS_FILE))?;
        let favorites: Vec<Favorite> = load_rows(&root.join(FAVORITES_FILE))?;

        let next_user_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let next_favorite_id = favorites.iter().map(|f| f.id).max().unwrap_or(0) + 1;

        Ok(Self {
            root,
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
            favorites: RwLock::new(favorites),
            next_user_id: AtomicI64::new(next_user_id),
            next_favorite_id: AtomicI64::new(next_favorite_id),
        })
    }

    async fn persist_users(&self, users: &HashMap<i64, User>) -> Result<(), AppError> {
        let mut rows: Vec<&User> = users.values().collect();
        rows.sort_by_key(|u| u.id);
        let json = serde_json::to_string_pretty(&rows)?;
        tokio_fs::write(self.root.join(USERS_FILE), json).await?;
        Ok(())
    }

    async fn persist_favorites(&self, favorites: &[Favorite]) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(favorites)?;
        tokio_fs::write(self.root.join(FAVORITES_FILE), json).await?;
        Ok(())
    }
}

fn load_rows<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[async_trait]
impl UserStore for FlatFileStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }

        let id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let user = User {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };

        users.insert(id, user.clone());
        self.persist_users(&users).await?;
        Ok(user)
    }

    async fn set_refresh_token(&self, id: i64, token: Option<&str>) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let changed = if let Some(user) = users.get_mut(&id) {
            user.refresh_token = token.map(str::to_string);
            user.updated_at = Utc::now();
            true
        } else {
            false
        };

        if changed {
            self.persist_users(&users).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl FavoriteStore for FlatFileStore {
    async fn list(&self, user_id: &str) -> Result<Vec<Favorite>, AppError> {
        let favorites = self.favorites.read().await;
        Ok(favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add(&self, new: &AddFavoriteRequest) -> Result<Favorite, AppError> {
        let mut favorites = self.favorites.write().await;
        let favorite = Favorite {
            id: self.next_favorite_id.fetch_add(1, Ordering::SeqCst),
            user_id: new.user_id.clone(),
            recipe_id: new.recipe_id,
            title: new.title.clone(),
            image: new.image.clone(),
            cook_time: new.cook_time.clone(),
            servings: new.servings.clone(),
            created_at: Utc::now(),
        };

        favorites.push(favorite.clone());
        self.persist_favorites(&favorites).await?;
        Ok(favorite)
    }

    async fn remove(
        &self,
        user_id: &str,
        recipe_id: i64,
    ) -> Result<Option<Favorite>, AppError> {
        let mut favorites = self.favorites.write().await;
        let Some(pos) = favorites
            .iter()
            .position(|f| f.user_id == user_id && f.recipe_id == recipe_id)
        else {
            return Ok(None);
        };

        let removed = favorites.remove(pos);
        self.persist_favorites(&favorites).await?;
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn add_request(user_id: &str, recipe_id: i64, title: &str) -> AddFavoriteRequest {
        AddFavoriteRequest {
            user_id: user_id.to_string(),
            recipe_id,
            title: title.to_string(),
            image: None,
            cook_time: Some("35 minutes".to_string()),
            servings: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let dir = tempdir().unwrap();
        let store = FlatFileStore::new(dir.path()).unwrap();

        let user = store.create("a@x.com", "hash-1").await.unwrap();
        assert_eq!(user.id, 1);
        assert!(user.refresh_token.is_none());

        let found = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        let found = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.email, "a@x.com");

        assert!(store.find_by_email("b@x.com").await.unwrap().is_none());
        assert!(store.find_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let dir = tempdir().unwrap();
        let store = FlatFileStore::new(dir.path()).unwrap();

        store.create("a@x.com", "hash-1").await.unwrap();
        let err = store.create("a@x.com", "hash-2").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        // the failed attempt must not consume an id
        let next = store.create("b@x.com", "hash-3").await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_set_refresh_token_overwrites_and_revokes() {
        let dir = tempdir().unwrap();
        let store = FlatFileStore::new(dir.path()).unwrap();
        let user = store.create("a@x.com", "hash").await.unwrap();

        store
            .set_refresh_token(user.id, Some("token-1"))
            .await
            .unwrap();
        store
            .set_refresh_token(user.id, Some("token-2"))
            .await
            .unwrap();
        let stored = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some("token-2"));
        assert!(stored.updated_at >= stored.created_at);

        store.set_refresh_token(user.id, None).await.unwrap();
        let stored = store.find_by_id(user.id).await.unwrap().unwrap();
        assert!(stored.refresh_token.is_none());

        // unknown id is a no-op, not an error
        store.set_refresh_token(999, Some("t")).await.unwrap();
    }

    #[tokio::test]
    async fn test_users_survive_reload() {
        let dir = tempdir().unwrap();
        {
            let store = FlatFileStore::new(dir.path()).unwrap();
            let user = store.create("a@x.com", "hash").await.unwrap();
            store
                .set_refresh_token(user.id, Some("token-1"))
                .await
                .unwrap();
        }

        let store = FlatFileStore::new(dir.path()).unwrap();
        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.refresh_token.as_deref(), Some("token-1"));

        // id assignment continues past reloaded rows
        let next = store.create("b@x.com", "hash").await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_favorites_crud() {
        let dir = tempdir().unwrap();
        let store = FlatFileStore::new(dir.path()).unwrap();

        let added = store
            .add(&add_request("7", 52772, "Teriyaki Chicken"))
            .await
            .unwrap();
        store
            .add(&add_request("7", 52804, "Poutine"))
            .await
            .unwrap();
        store
            .add(&add_request("8", 52772, "Teriyaki Chicken"))
            .await
            .unwrap();

        let listed = store.list("7").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], added);

        let removed = store.remove("7", 52772).await.unwrap().unwrap();
        assert_eq!(removed.id, added.id);
        assert_eq!(store.list("7").await.unwrap().len(), 1);

        // second delete finds nothing
        assert!(store.remove("7", 52772).await.unwrap().is_none());
        // other user's record is untouched
        assert_eq!(store.list("8").await.unwrap().len(), 1);
    }
}

// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the recipebox mobile client and server.
//! All field names serialize as camelCase to match the mobile client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of a user record. Never carries the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: i64,
    pub email: String,
}

/// Body for `POST /signup`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /signin`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /refresh-token`. The token may come from the
/// `refreshToken` cookie instead, so the body field is optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Response for sign-up and sign-in.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserView,
}

/// Response for `POST /refresh-token`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
}

/// Generic `{message}` response body.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponse {
    pub message: String,
}

/// A bookmarked recipe. `user_id` is free-form text, matching the
/// favorites table schema rather than the numeric users id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i64,
    pub user_id: String,
    pub recipe_id: i64,
    pub title: String,
    pub image: Option<String>,
    pub cook_time: Option<String>,
    pub servings: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /favorites`. `user_id`, `recipe_id` and `title`
/// are required; the rest default to absent.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub user_id: String,
    pub recipe_id: i64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub servings: Option<String>,
}

/// Response for `GET /favorites/{userId}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FavoritesResponse {
    pub message: String,
    pub data: Vec<Favorite>,
}

/// Response for adding or removing a single favorite.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FavoriteResponse {
    pub message: String,
    pub data: Favorite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_uses_camel_case() {
        let response = AuthResponse {
            message: "Login successful".to_string(),
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            user: UserView {
                id: 1,
                email: "a@x.com".to_string(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["user"]["email"], "a@x.com");
    }

    #[test]
    fn add_favorite_optional_fields_default() {
        let req: AddFavoriteRequest = serde_json::from_str(
            r#"{"userId":"1","recipeId":52772,"title":"Teriyaki Chicken"}"#,
        )
        .unwrap();
        assert_eq!(req.user_id, "1");
        assert_eq!(req.recipe_id, 52772);
        assert!(req.image.is_none());
        assert!(req.cook_time.is_none());
    }

    #[test]
    fn refresh_request_body_may_be_empty() {
        let req: RefreshTokenRequest = serde_json::from_str("{}").unwrap();
        assert!(req.refresh_token.is_none());
    }
}

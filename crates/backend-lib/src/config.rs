// ============================
// backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Secret for signing access tokens
    pub access_token_secret: String,
    /// Secret for signing refresh tokens. Kept separate so compromise of
    /// one token class does not compromise the other.
    pub refresh_token_secret: String,
    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_ttl_secs: i64,
    /// Mark session cookies `Secure` (enable behind TLS)
    pub secure_cookies: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5001".parse().unwrap(),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            access_token_secret: "dev-access-secret-change-me".to_string(),
            refresh_token_secret: "dev-refresh-secret-change-me".to_string(),
            access_token_ttl_secs: 15 * 60,          // 15 minutes
            refresh_token_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            secure_cookies: false,
        }
    }
}

impl Settings {
    /// Load settings from `config.toml` and `RECIPEBOX_`-prefixed
    /// environment variables, on top of the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load settings with an explicit config file path.
    pub fn load_from(path: &str) -> Result<Self> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("RECIPEBOX_"))
            .extract()?;

        Ok(settings)
    }
}

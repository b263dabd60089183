//! # configs
//!
//! Layered application configuration: built-in defaults, then an optional
//! TOML file, then `POSTS_BOARD__*` environment variables (a `.env` file is
//! loaded into the environment first).
//!
//! ```text
//! POSTS_BOARD__TRACKING__SECRET=...        # required, >= 32 bytes
//! POSTS_BOARD__SERVER__BIND_ADDR=0.0.0.0:8000
//! POSTS_BOARD__AUTH__ADMIN_IDENTITY=admin
//! ```

use std::net::SocketAddr;

use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "POSTS_BOARD";
pub const DEFAULT_FILE: &str = "posts-board";
/// Shortest tracking secret accepted.
pub const MIN_SECRET_LEN: usize = 32;
/// Longest tracking cookie lifetime accepted: ten years.
pub const MAX_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub tracking: TrackingConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Deserialize)]
pub struct TrackingConfig {
    /// Key for the tracking-id HMAC. Never logged.
    pub secret: SecretString,
    pub cookie_name: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Header through which the upstream authenticator passes the caller identity
    pub user_header: String,
    /// Caller allowed to delete any post
    pub admin_identity: String,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl AppConfig {
    /// Loads `.env`, then defaults, `path` (or `posts-board.toml` when
    /// `None`, if present) and the environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        if let Ok(dotenv) = dotenvy::dotenv() {
            tracing::debug!(path = %dotenv.display(), "loaded .env");
        }

        let builder = Self::defaults()?
            .add_source(File::with_name(path.unwrap_or(DEFAULT_FILE)).required(path.is_some()))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    /// Builder pre-populated with every default. There is no default secret.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(config::Config::builder()
            .set_default("server.bind_addr", "127.0.0.1:8000")?
            .set_default("tracking.cookie_name", "tracking_id")?
            .set_default("tracking.ttl_hours", 24)?
            .set_default("auth.user_header", "x-forwarded-user")?
            .set_default("auth.admin_identity", "admin")?
            .set_default("log.level", "info")?
            .set_default("log.json", false)?)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let cfg: AppConfig = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tracking.secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid(format!(
                "tracking.secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if !(1..=MAX_TTL_HOURS).contains(&self.tracking.ttl_hours) {
            return Err(ConfigError::Invalid(format!(
                "tracking.ttl_hours must be between 1 and {MAX_TTL_HOURS}"
            )));
        }
        let is_cookie_char = |c: char| c.is_ascii_alphanumeric() || "-_.".contains(c);
        if self.tracking.cookie_name.is_empty() || !self.tracking.cookie_name.chars().all(is_cookie_char) {
            return Err(ConfigError::Invalid(format!(
                "tracking.cookie_name {:?} is not a valid cookie name",
                self.tracking.cookie_name
            )));
        }
        let is_header_char = |c: char| c.is_ascii_alphanumeric() || c == '-';
        if self.auth.user_header.is_empty() || !self.auth.user_header.chars().all(is_header_char) {
            return Err(ConfigError::Invalid(format!(
                "auth.user_header {:?} is not a valid header name",
                self.auth.user_header
            )));
        }
        if self.auth.admin_identity.is_empty() {
            return Err(ConfigError::Invalid("auth.admin_identity must not be empty".into()));
        }
        Ok(())
    }
}

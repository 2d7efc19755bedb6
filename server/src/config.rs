use recipebox_core::config::{parse_env, require_env, ConfigError};
use recipebox_core::SlugScopeMode;
use std::net::SocketAddr;

/// Server settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub slug_scope: SlugScopeMode,
}

impl ServerConfig {
    /// Required: `DATABASE_URL`.
    /// Optional: `RECIPEBOX_BIND_ADDR` (default "0.0.0.0:3000"),
    /// `RECIPEBOX_SLUG_SCOPE` ("per_owner" or "global", default "per_owner").
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: require_env("DATABASE_URL")?,
            bind_addr: parse_env("RECIPEBOX_BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            slug_scope: parse_env("RECIPEBOX_SLUG_SCOPE", SlugScopeMode::default())?,
        })
    }
}

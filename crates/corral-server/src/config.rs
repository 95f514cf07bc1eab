use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server settings, read from TOML. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Host (and port) used in pagination links instead of the request's
    /// `Host` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_host: Option<String>,
    pub max_body_bytes: usize,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Answer CORS preflights for any origin.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            public_host: None,
            max_body_bytes: 1024 * 1024,
            log_filter: "info".into(),
            cors_permissive: false,
        }
    }
}

impl ServerConfig {
    /// Read a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text).map_err(|e| match e {
            ServerError::Config(reason) => {
                ServerError::Config(format!("{}: {reason}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }
}

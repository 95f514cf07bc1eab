use tokio::net::TcpListener;

use corral_protocol::Codecs;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::{AppState, Resources};

/// Serves a set of collections over HTTP.
pub struct CorralServer {
    config: ServerConfig,
    resources: Resources,
    codecs: Codecs,
}

impl CorralServer {
    /// A JSON-only server for `resources`.
    pub fn new(config: ServerConfig, resources: Resources) -> Self {
        Self {
            config,
            resources,
            codecs: Codecs::json(),
        }
    }

    /// Replace the codec tables.
    pub fn with_codecs(mut self, codecs: Codecs) -> Self {
        self.codecs = codecs;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        let state = AppState::new(self.resources.clone(), self.codecs.clone())
            .with_public_host(self.config.public_host.clone());
        build_router(state, &self.config)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            collections = ?self.resources,
            "corral server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use corral_core::fixtures;

    #[test]
    fn server_construction() {
        let server = CorralServer::new(ServerConfig::default(), Resources::new());
        assert_eq!(server.config().bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert!(server.resources().is_empty());
    }

    #[test]
    fn router_builds() {
        let resources = Resources::new().with("zoo", Arc::new(fixtures::zoo()));
        let server = CorralServer::new(ServerConfig::default(), resources);
        let _router = server.router();
    }
}

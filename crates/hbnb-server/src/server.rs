use std::sync::Arc;

use hbnb_places::PlaceService;
use hbnb_store::{EntityStore, InMemoryEntityStore, JsonFileStore};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// HBnB API server.
pub struct HbnbServer {
    config: ServerConfig,
    service: Arc<PlaceService>,
}

impl HbnbServer {
    /// Open the store named by `config` (in-memory when no data file is
    /// set) and wrap it in a service.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store: Arc<dyn EntityStore> = match &config.data_file {
            Some(path) => {
                info!(path = %path.display(), "opening file store");
                Arc::new(JsonFileStore::open(path.clone())?)
            }
            None => {
                info!("using in-memory store");
                Arc::new(InMemoryEntityStore::new())
            }
        };
        let service = Arc::new(PlaceService::with_options(store, config.search));
        Ok(Self::with_service(config, service))
    }

    pub fn with_service(config: ServerConfig, service: Arc<PlaceService>) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn service(&self) -> &Arc<PlaceService> {
        &self.service
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.service))
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("HBnB API listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

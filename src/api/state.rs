//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{ServiceContainer, Services};

/// Handler state: the service container plus the infrastructure pieces
/// the middleware talks to directly.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Used by the rate limiter and the health check.
    pub cache: Arc<Cache>,
    /// Used by the health check.
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the full container from live connections.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: Config) -> Self {
        let services = Arc::new(Services::from_connection(
            database.connection().clone(),
            (*cache).clone(),
            config,
        ));

        Self {
            services,
            cache,
            database,
        }
    }
}

//! Service wiring: backend resolution and HTTP application assembly.

mod config;

pub use config::{
    BIND_ADDR_VAR, CONNECTION_STRING_VAR, ConfigError, REALM_VAR, STORAGE_PROVIDER_VAR,
    ServiceConfig,
};

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::domain::AccountDirectoryService;
use crate::domain::ports::{AccountDirectory, NameStore};
use crate::inbound::http::dispatch::{MethodDispatcher, directory_endpoint};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::outbound::persistence::{BackendConfig, BackendRegistry, RegistryError};

/// Shared handles produced by [`connect`].
#[derive(Clone)]
pub struct DirectoryHandles {
    pub directory: Arc<dyn AccountDirectory>,
    pub names: Arc<dyn NameStore>,
}

impl std::fmt::Debug for DirectoryHandles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryHandles").finish_non_exhaustive()
    }
}

/// Resolve the configured backend and construct the service stack.
///
/// This is the one-time startup wiring: configuration names a backend, the
/// registry constructs it, and the directory service is built over the
/// resulting store. Failures here are fatal; the process must not serve
/// requests without a working backend.
pub fn connect(config: &ServiceConfig) -> Result<DirectoryHandles, RegistryError> {
    let registry = BackendRegistry::builtin();
    let backend = registry.resolve(
        &config.storage_provider,
        &BackendConfig {
            connection_string: config.connection_string.clone(),
            realm: config.realm.clone(),
        },
    )?;
    info!(
        provider = %config.storage_provider,
        realm = %config.realm,
        "storage backend resolved"
    );

    Ok(DirectoryHandles {
        directory: Arc::new(AccountDirectoryService::new(backend.accounts)),
        names: backend.names,
    })
}

/// Run the HTTP server until shutdown.
pub async fn run(config: ServiceConfig, handles: DirectoryHandles) -> std::io::Result<()> {
    let dispatcher = web::Data::new(MethodDispatcher::new(handles.directory, handles.names));
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so readiness stays reachable below.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(dispatcher.clone())
            .app_data(server_health_state.clone())
            .service(directory_endpoint)
            .service(ready)
            .service(live)
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "directory server listening");
    server.run().await
}

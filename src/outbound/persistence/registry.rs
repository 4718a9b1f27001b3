//! Name-keyed backend construction.
//!
//! The registry replaces runtime plugin loading with an explicit mapping
//! from backend name to constructor, resolved once at startup. The
//! dispatcher and service layer never learn which implementation is active.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::ports::{AccountStore, NameStore};
use crate::outbound::persistence::{MemoryAccountStore, MemoryNameStore};

/// Resolved configuration handed to backend constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub connection_string: String,
    /// Schema/table-namespace qualifier for backends that use one.
    pub realm: String,
}

/// Store handles produced by one backend constructor.
#[derive(Clone)]
pub struct Backend {
    pub accounts: Arc<dyn AccountStore>,
    pub names: Arc<dyn NameStore>,
}

/// Errors raised while resolving a backend at startup. All of these are
/// fatal: the process must not serve requests without a working backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("storage backend name is empty")]
    EmptyBackendName,
    #[error("connection string is empty")]
    EmptyConnectionString,
    #[error("unknown storage backend {name:?}")]
    UnknownBackend { name: String },
    #[error("storage backend {name:?} failed to initialize: {message}")]
    Initialization { name: String, message: String },
}

type Constructor = fn(&BackendConfig) -> Result<Backend, RegistryError>;

/// Maps backend names to constructors.
pub struct BackendRegistry {
    constructors: HashMap<&'static str, Constructor>,
}

impl BackendRegistry {
    /// Registry preloaded with the built-in backends.
    pub fn builtin() -> Self {
        let mut registry = Self {
            constructors: HashMap::new(),
        };
        registry.register("memory", memory_backend);
        registry
    }

    /// Add a constructor under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &'static str, constructor: Constructor) {
        self.constructors.insert(name, constructor);
    }

    /// Construct the backend configured under `name`.
    pub fn resolve(&self, name: &str, config: &BackendConfig) -> Result<Backend, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyBackendName);
        }
        if config.connection_string.is_empty() {
            return Err(RegistryError::EmptyConnectionString);
        }
        let constructor =
            self.constructors
                .get(name)
                .ok_or_else(|| RegistryError::UnknownBackend {
                    name: name.to_owned(),
                })?;
        constructor(config)
    }
}

fn memory_backend(config: &BackendConfig) -> Result<Backend, RegistryError> {
    info!(realm = %config.realm, "memory backend initialized");
    Ok(Backend {
        accounts: Arc::new(MemoryAccountStore::new()),
        names: Arc::new(MemoryNameStore::new()),
    })
}

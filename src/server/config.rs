//! Resolved service configuration.

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

/// Environment variable naming the storage backend.
pub const STORAGE_PROVIDER_VAR: &str = "DIRECTORY_STORAGE_PROVIDER";
/// Environment variable carrying the backend connection string.
pub const CONNECTION_STRING_VAR: &str = "DIRECTORY_CONNECTION_STRING";
/// Environment variable naming the backend realm (schema/table namespace).
pub const REALM_VAR: &str = "DIRECTORY_REALM";
/// Environment variable carrying the listen address.
pub const BIND_ADDR_VAR: &str = "DIRECTORY_BIND_ADDR";

const DEFAULT_REALM: &str = "useraccounts";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8114";

/// Startup configuration for the directory process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub storage_provider: String,
    pub connection_string: String,
    pub realm: String,
    pub bind_addr: SocketAddr,
}

/// Configuration failures; all fatal before the server starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be set and non-empty")]
    Missing { name: &'static str },
    #[error("{name} is not a valid socket address: {value:?}")]
    InvalidBindAddr { name: &'static str, value: String },
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    ///
    /// `DIRECTORY_REALM` defaults to `useraccounts` and
    /// `DIRECTORY_BIND_ADDR` to `0.0.0.0:8114`; the storage provider and
    /// connection string are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let require = |name: &'static str| -> Result<String, ConfigError> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(ConfigError::Missing { name }),
            }
        };

        let storage_provider = require(STORAGE_PROVIDER_VAR)?;
        let connection_string = require(CONNECTION_STRING_VAR)?;
        let realm = lookup(REALM_VAR).unwrap_or_else(|| DEFAULT_REALM.to_owned());

        let bind_value = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind_value
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr {
                name: BIND_ADDR_VAR,
                value: bind_value,
            })?;

        Ok(Self {
            storage_provider,
            connection_string,
            realm,
            bind_addr,
        })
    }
}

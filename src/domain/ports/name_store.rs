//! Driven port for the legacy name/favourite-food sample store.
//!
//! This capability predates the account directory and has a weaker
//! consistency model: records upsert by full name and carry no identity
//! key. It stays decoupled from [`AccountStore`] so neither contract leaks
//! into the other.
//!
//! [`AccountStore`]: super::AccountStore

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Legacy sample record: a name pair and a favourite food.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    pub first_name: String,
    pub last_name: String,
    pub food: String,
}

impl NameEntry {
    /// The `"First Last"` string used as the upsert key.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Errors raised by name store backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameStoreError {
    /// Query or mutation failed during execution.
    #[error("name store query failed: {message}")]
    Query { message: String },
}

/// Storage capability behind the legacy sample endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NameStore: Send + Sync {
    /// Store an entry, overwriting any record with the same full name.
    async fn store(&self, entry: &NameEntry) -> Result<(), NameStoreError>;

    /// List every stored entry.
    async fn list(&self) -> Result<Vec<NameEntry>, NameStoreError>;
}

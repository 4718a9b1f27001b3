//! Driven port for account storage backends.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::Account;

/// Errors raised by account storage backends.
///
/// Adapters map their internal failures into these variants so the service
/// layer never sees backend-specific error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountStoreError {
    /// Backend connection could not be established or was lost.
    #[error("account store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("account store query failed: {message}")]
    Query { message: String },
}

/// Storage capability consumed by the directory service.
///
/// All lookups are scope-qualified; records stored in the global scope are
/// visible from every scope. `upsert` is keyed by `principal_id` — name
/// uniqueness is the service's read-before-write, not a store guarantee.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch an account by principal id.
    async fn find_by_id(
        &self,
        scope_id: Uuid,
        principal_id: Uuid,
    ) -> Result<Option<Account>, AccountStoreError>;

    /// Fetch an account by its unique name pair.
    async fn find_by_name(
        &self,
        scope_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Account>, AccountStoreError>;

    /// Fetch the first account matching an email address.
    async fn find_by_email(
        &self,
        scope_id: Uuid,
        email: &str,
    ) -> Result<Option<Account>, AccountStoreError>;

    /// Return every account whose name or email contains `text`.
    async fn search(&self, scope_id: Uuid, text: &str) -> Result<Vec<Account>, AccountStoreError>;

    /// Insert or replace the record keyed by `principal_id`.
    async fn upsert(&self, account: &Account) -> Result<(), AccountStoreError>;
}

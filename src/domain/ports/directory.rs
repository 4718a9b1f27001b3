//! Driving port exposed to inbound adapters.
//!
//! The method dispatcher depends on this trait only, so the concrete service
//! (and the backend beneath it) can be swapped without touching the wire
//! layer. Tests substitute a mock.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, AccountUpdate, DirectoryError, NewAccount};

/// Directory use-cases invoked by the method dispatcher.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Create an account; fails when the scoped name pair is taken.
    async fn create_account(&self, request: NewAccount) -> Result<Account, DirectoryError>;

    /// Replace every mutable field of an existing account.
    async fn update_account(&self, request: AccountUpdate) -> Result<Account, DirectoryError>;

    /// Look an account up by its unique name pair.
    async fn account_by_name(
        &self,
        scope_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Account>, DirectoryError>;

    /// Look an account up by email address.
    async fn account_by_email(
        &self,
        scope_id: Uuid,
        email: &str,
    ) -> Result<Option<Account>, DirectoryError>;

    /// Look an account up by principal id.
    async fn account_by_id(
        &self,
        scope_id: Uuid,
        principal_id: Uuid,
    ) -> Result<Option<Account>, DirectoryError>;

    /// Free-text search over names and email; empty when nothing matches.
    async fn search_accounts(
        &self,
        scope_id: Uuid,
        text: &str,
    ) -> Result<Vec<Account>, DirectoryError>;
}

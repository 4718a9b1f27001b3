//! Domain-level error taxonomy.
//!
//! These errors are transport agnostic. The method dispatcher maps them onto
//! response envelopes; nothing here decides what an untrusted caller sees.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::account::AccountValidationError;
use crate::domain::ports::AccountStoreError;

/// Failures surfaced by directory use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Create collided with an existing `(scope, first, last)` pair.
    #[error("account {first_name} {last_name} already exists in scope {scope_id}")]
    AlreadyExists {
        scope_id: Uuid,
        first_name: String,
        last_name: String,
    },
    /// Update target does not exist.
    #[error("no account with principal id {principal_id}")]
    NotFound { principal_id: Uuid },
    /// Request fields violated an account invariant.
    #[error(transparent)]
    Validation(#[from] AccountValidationError),
    /// The storage backend failed.
    #[error(transparent)]
    Store(#[from] AccountStoreError),
}

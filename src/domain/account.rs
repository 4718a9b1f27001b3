//! Account data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The well-known "global" scope. Accounts created without an explicit scope
/// land here, and records stored here are visible from every scope.
pub const GLOBAL_SCOPE: Uuid = Uuid::nil();

/// Validation errors raised when account fields violate an invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountValidationError {
    #[error("first name must not be empty")]
    EmptyFirstName,
    #[error("last name must not be empty")]
    EmptyLastName,
}

/// Check the name-pair invariant shared by create and update.
pub fn validate_names(first_name: &str, last_name: &str) -> Result<(), AccountValidationError> {
    if first_name.trim().is_empty() {
        return Err(AccountValidationError::EmptyFirstName);
    }
    if last_name.trim().is_empty() {
        return Err(AccountValidationError::EmptyLastName);
    }
    Ok(())
}

/// Fixed set of capability endpoints attached to an account.
///
/// The wire keys mirror the directory protocol; absent endpoints serialize
/// as empty strings rather than being omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUrls {
    #[serde(rename = "HomeURI")]
    pub home: String,
    #[serde(rename = "GatekeeperURI")]
    pub gatekeeper: String,
    #[serde(rename = "InventoryServerURI")]
    pub inventory: String,
    #[serde(rename = "AssetServerURI")]
    pub asset: String,
}

/// Directory account record.
///
/// ## Invariants
/// - `first_name` and `last_name` are non-empty once trimmed.
/// - `(scope_id, first_name, last_name)` is unique within a backend.
/// - `principal_id` is globally unique once assigned and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub principal_id: Uuid,
    pub scope_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_flags: i32,
    pub user_level: i32,
    pub user_title: String,
    pub service_urls: ServiceUrls,
    pub created: DateTime<Utc>,
}

/// Parameters accepted when creating an account.
///
/// `service_urls` is optional: `None` asks the service to fill the default
/// empty-valued endpoint set.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub scope_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_flags: i32,
    pub user_level: i32,
    pub user_title: String,
    pub service_urls: Option<ServiceUrls>,
}

/// Full replacement fields for an existing account.
///
/// Updates replace every mutable field; only `principal_id` and `created`
/// survive from the stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountUpdate {
    pub principal_id: Uuid,
    pub scope_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_flags: i32,
    pub user_level: i32,
    pub user_title: String,
    pub service_urls: ServiceUrls,
}

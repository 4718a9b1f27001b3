//! Domain entities and services for the account directory.
//!
//! Purpose: strongly typed account records, the directory service mediating
//! between inbound adapters and storage ports, and the error taxonomy shared
//! by both. Serialisation contracts (serde) are documented on each type.

pub mod account;
pub mod directory;
pub mod error;
pub mod ports;

pub use self::account::{
    Account, AccountUpdate, AccountValidationError, GLOBAL_SCOPE, NewAccount, ServiceUrls,
};
pub use self::directory::AccountDirectoryService;
pub use self::error::DirectoryError;

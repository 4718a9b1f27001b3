//! Storage backends for the directory ports.
//!
//! Backends are selected by name through [`BackendRegistry`] once at
//! startup. Implementations translate between stored records and domain
//! types only; uniqueness and validation stay in the service layer.

mod memory;
mod registry;

pub use memory::{MemoryAccountStore, MemoryNameStore};
pub use registry::{Backend, BackendConfig, BackendRegistry, RegistryError};

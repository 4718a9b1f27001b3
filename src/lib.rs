//! Account-directory service: wire envelope, method dispatch, and pluggable
//! account storage.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

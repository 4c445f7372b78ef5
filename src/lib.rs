//! Personal secret vault: username/password accounts holding entries
//! that are each encrypted under a key derived from their own passkey.

#[cfg(feature = "audit-log")]
pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod vault;

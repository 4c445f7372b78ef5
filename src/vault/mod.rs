//! Vault module — accounts and their encrypted entries.
//!
//! This module provides:
//! - `Account` and `Entry` records (`account`)
//! - The JSON store document and atomic persistence (`format`)
//! - The `Session` handle returned by a successful login (`session`)
//! - High-level `CredentialStore` for login and entry management (`store`)

pub mod account;
pub mod format;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use account::{Account, Entry, EntryId};
pub use format::StoreDocument;
pub use session::Session;
pub use store::{CredentialStore, MAX_FAILED_ATTEMPTS};

//! Cryptographic primitives for the vault.
//!
//! This module provides:
//! - Argon2id password-based key derivation (`kdf`)
//! - The zeroizing `DerivedKey` type (`keys`)
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Passkey envelopes built from the above (`envelope`)

pub mod encryption;
pub mod envelope;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_key, ...};
pub use encryption::{decrypt, encrypt};
pub use envelope::{open, open_with_params, seal, seal_with_params, Envelope};
pub use kdf::{derive_key, derive_key_with_params, generate_salt, KdfParams, SALT_LEN};
pub use keys::{DerivedKey, KEY_LEN};

use std::path::PathBuf;

use thiserror::Error;

/// Authentication failures reported by `CredentialStore::register_or_login`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("All fields required: username, password, data and passkey cannot be empty")]
    MissingFields,

    #[error("Invalid credentials. {remaining} attempts left")]
    InvalidCredentials { remaining: u32 },

    #[error("Too many failed login attempts — restart the application to try again")]
    LockedOut,

    #[error("Session for '{0}' no longer matches any account")]
    UnknownSession(String),
}

/// Decryption failures.
///
/// A wrong passkey and a tampered ciphertext are deliberately reported
/// the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecryptError {
    #[error("Invalid passkey or corrupted data")]
    AuthenticationFailed,
}

/// Failures of the JSON store file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Store file {path} is unreadable: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Failed to write store file {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}

/// All errors that can occur in the vault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Core errors ---
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Decrypt(#[from] DecryptError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Entry errors ---
    #[error("Data not found — no entry with id {0}")]
    EntryNotFound(u64),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Convenience type alias for vault results.
pub type Result<T> = std::result::Result<T, VaultError>;

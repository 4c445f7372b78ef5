//! The credential store: accounts, login, and per-user entry lists.
//!
//! `CredentialStore` owns the whole store document in memory and writes
//! it back to disk after every mutation, so callers work with simple
//! method calls like `store.store_secret(&session, b"...", b"passkey")`.

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::crypto::{self, derive_key, generate_salt, DerivedKey, Envelope};
use crate::errors::{AuthError, DecryptError, PersistenceError, Result, VaultError};

use super::account::{Account, Entry, EntryId};
use super::format::{self, StoreDocument};
use super::session::Session;

/// Failed logins allowed per process before further attempts are refused.
pub const MAX_FAILED_ATTEMPTS: u32 = 3;

/// The main store handle.  Create one with `CredentialStore::open`, log
/// in with `register_or_login`, then use the session for entry
/// operations.
pub struct CredentialStore {
    /// Path to the JSON store file.
    path: PathBuf,

    /// Username -> account.
    accounts: StoreDocument,

    /// Failed logins since this store was opened, across all usernames.
    failed_attempts: u32,

    /// Lockout threshold for `failed_attempts`.
    max_failed_attempts: u32,
}

impl CredentialStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open the store at `path`.
    ///
    /// A missing or unreadable file yields an empty store; nothing is
    /// written until the first mutation.
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            accounts: format::load(path),
            failed_attempts: 0,
            max_failed_attempts: MAX_FAILED_ATTEMPTS,
        }
    }

    /// Replace the lockout threshold (at least 1).
    pub fn with_max_failed_attempts(mut self, max: u32) -> Self {
        self.max_failed_attempts = max.max(1);
        self
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    /// Log in as `username`, creating the account if it does not exist.
    ///
    /// Unknown usernames are provisioned on the spot with `password` as
    /// their password.  For known usernames the password is re-derived
    /// with the stored salt and compared in constant time; each mismatch
    /// counts towards the lockout.
    pub fn register_or_login(&mut self, username: &str, password: &[u8]) -> Result<Session> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields.into());
        }

        if self.is_locked_out() {
            tracing::warn!(username, "login refused, attempts exhausted");
            return Err(AuthError::LockedOut.into());
        }

        let Some(account) = self.accounts.get(username) else {
            return self.register(username, password);
        };

        let attempt = derive_key(password, &account.password_salt)?;
        let verified = DerivedKey::from_slice(&account.password_verifier)
            .is_some_and(|stored| stored.ct_eq(&attempt));

        if !verified {
            self.failed_attempts += 1;
            let remaining = self.remaining_attempts();
            tracing::warn!(username, remaining, "invalid credentials");
            return Err(AuthError::InvalidCredentials { remaining }.into());
        }

        tracing::info!(username, "logged in");
        Ok(Session::new(username, false))
    }

    /// Provision a new account and persist it.
    fn register(&mut self, username: &str, password: &[u8]) -> Result<Session> {
        let salt = generate_salt()?;
        let verifier = derive_key(password, &salt)?;

        self.accounts.insert(
            username.to_string(),
            Account::new(salt.to_vec(), verifier.as_bytes().to_vec()),
        );

        if let Err(e) = self.save() {
            self.accounts.remove(username);
            return Err(e);
        }

        tracing::info!(username, "account created");
        Ok(Session::new(username, true))
    }

    /// Failed logins since the store was opened.
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Logins left before the store refuses further attempts.
    pub fn remaining_attempts(&self) -> u32 {
        self.max_failed_attempts.saturating_sub(self.failed_attempts)
    }

    /// `true` once the failed-login budget is spent.
    pub fn is_locked_out(&self) -> bool {
        self.failed_attempts >= self.max_failed_attempts
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Append a sealed envelope to the session's account and persist.
    ///
    /// If the save fails the entry is dropped again so memory and disk
    /// stay in step.
    pub fn append_entry(&mut self, session: &Session, envelope: Envelope) -> Result<EntryId> {
        let path = self.path.clone();
        let account = self.account_mut(session)?;
        let id = account
            .next_entry_id()
            .ok_or_else(|| PersistenceError::WriteFailed {
                path,
                reason: "no entry ids left".into(),
            })?;
        account.entries.push(Entry::from_envelope(id, envelope));

        if let Err(e) = self.save() {
            if let Ok(account) = self.account_mut(session) {
                account.entries.retain(|entry| entry.id != id);
            }
            return Err(e);
        }

        tracing::info!(username = session.username(), entry_id = id, "entry stored");
        Ok(id)
    }

    /// Seal `plaintext` under `passkey` and append it.
    pub fn store_secret(
        &mut self,
        session: &Session,
        plaintext: &[u8],
        passkey: &[u8],
    ) -> Result<EntryId> {
        // Fail before the KDF runs if the session is stale.
        self.account(session)?;
        let envelope = crypto::seal(plaintext, passkey)?;
        self.append_entry(session, envelope)
    }

    /// Snapshot of the session's entries in insertion order.
    pub fn list_entries(&self, session: &Session) -> Result<Vec<Entry>> {
        Ok(self.account(session)?.entries.clone())
    }

    /// A copy of entry `id` of the session's account.
    pub fn entry(&self, session: &Session, id: EntryId) -> Result<Entry> {
        self.account(session)?
            .entry(id)
            .cloned()
            .ok_or(VaultError::EntryNotFound(id))
    }

    /// Number of entries the session's account holds.
    pub fn entry_count(&self, session: &Session) -> Result<usize> {
        Ok(self.account(session)?.entries.len())
    }

    /// Decrypt entry `id` of the session's account with `passkey`.
    pub fn decrypt_entry(
        &self,
        session: &Session,
        id: EntryId,
        passkey: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        if passkey.is_empty() {
            return Err(AuthError::MissingFields.into());
        }

        let entry = self
            .account(session)?
            .entry(id)
            .ok_or(VaultError::EntryNotFound(id))?;

        // A stored salt of the wrong length can only come from a damaged
        // file; report it like any other corruption.
        let envelope = entry
            .envelope()
            .ok_or(VaultError::Decrypt(DecryptError::AuthenticationFailed))?;

        let plaintext = crypto::open(&envelope, passkey);
        if plaintext.is_err() {
            tracing::warn!(
                username = session.username(),
                entry_id = id,
                "entry decryption failed"
            );
        }
        plaintext
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the whole store to disk atomically.
    pub fn save(&self) -> Result<()> {
        format::save(&self.path, &self.accounts)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of accounts in the store.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Returns `true` if an account exists for `username`.
    pub fn contains_user(&self, username: &str) -> bool {
        self.accounts.contains_key(username)
    }

    fn account(&self, session: &Session) -> Result<&Account> {
        self.accounts
            .get(session.username())
            .ok_or_else(|| AuthError::UnknownSession(session.username().to_string()).into())
    }

    fn account_mut(&mut self, session: &Session) -> Result<&mut Account> {
        self.accounts
            .get_mut(session.username())
            .ok_or_else(|| AuthError::UnknownSession(session.username().to_string()).into())
    }
}

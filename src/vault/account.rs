//! Account and Entry records as they appear in the store document.
//!
//! Binary fields use custom serde helpers so they serialize as URL-safe
//! base64 strings in JSON rather than raw byte arrays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::format::{base64_decode, base64_encode};
use crate::crypto::{Envelope, SALT_LEN};

/// Identifier of an entry within one account.  Starts at 1.
pub type EntryId = u64;

/// A user's credential material and encrypted entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Salt the password verifier was derived with.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub password_salt: Vec<u8>,

    /// The derived key itself, compared in constant time on login.
    #[serde(
        rename = "password_hash",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub password_verifier: Vec<u8>,

    /// Entries in insertion order.
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Account {
    /// A new account with no entries.
    pub fn new(password_salt: Vec<u8>, password_verifier: Vec<u8>) -> Self {
        Self {
            password_salt,
            password_verifier,
            entries: Vec::new(),
        }
    }

    /// The id the next appended entry will get.
    ///
    /// `None` once the highest stored id is `u64::MAX`.
    pub fn next_entry_id(&self) -> Option<EntryId> {
        self.entries
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    /// Find an entry by id.
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Give every entry without an id (id 0) the next free id, in order.
    ///
    /// Returns `None`, leaving ids untouched, when the id space is
    /// exhausted and no further entry could ever be appended.
    pub(crate) fn assign_missing_ids(&mut self) -> Option<()> {
        let mut next = self.next_entry_id()?;
        let missing = self.entries.iter().filter(|e| e.id == 0).count() as u64;
        // The last id handed out must still leave room for one more append.
        next.checked_add(missing)?;

        for entry in self.entries.iter_mut().filter(|e| e.id == 0) {
            entry.id = next;
            next += 1;
        }
        Some(())
    }
}

/// One sealed secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier, independent of the ciphertext.
    #[serde(default)]
    pub id: EntryId,

    /// Opaque `base64url(nonce || ciphertext || tag)`.
    pub encrypted_data: String,

    /// Salt the entry key was derived with.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub entry_salt: Vec<u8>,

    /// When the entry was appended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// Build an entry from a freshly sealed envelope.
    pub fn from_envelope(id: EntryId, envelope: Envelope) -> Self {
        Self {
            id,
            encrypted_data: envelope.ciphertext,
            entry_salt: envelope.salt.to_vec(),
            created_at: Some(Utc::now()),
        }
    }

    /// The envelope to hand to `crypto::open`.
    ///
    /// Returns `None` if the stored salt has the wrong length.
    pub fn envelope(&self) -> Option<Envelope> {
        let salt: [u8; SALT_LEN] = self.entry_salt.as_slice().try_into().ok()?;
        Some(Envelope {
            ciphertext: self.encrypted_data.clone(),
            salt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: EntryId) -> Entry {
        Entry {
            id,
            encrypted_data: format!("ct-{id}"),
            entry_salt: vec![0u8; SALT_LEN],
            created_at: None,
        }
    }

    #[test]
    fn next_entry_id_starts_at_one() {
        let account = Account::new(vec![0; SALT_LEN], vec![0; 32]);
        assert_eq!(account.next_entry_id(), Some(1));
    }

    #[test]
    fn next_entry_id_follows_highest() {
        let mut account = Account::new(vec![0; SALT_LEN], vec![0; 32]);
        account.entries = vec![entry(1), entry(5), entry(2)];
        assert_eq!(account.next_entry_id(), Some(6));
    }

    #[test]
    fn missing_ids_are_assigned_in_order() {
        let mut account = Account::new(vec![0; SALT_LEN], vec![0; 32]);
        account.entries = vec![entry(0), entry(3), entry(0)];
        assert_eq!(account.assign_missing_ids(), Some(()));

        let ids: Vec<EntryId> = account.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![4, 3, 5]);
    }

    #[test]
    fn next_entry_id_is_none_at_max() {
        let mut account = Account::new(vec![0; SALT_LEN], vec![0; 32]);
        account.entries = vec![entry(u64::MAX)];
        assert_eq!(account.next_entry_id(), None);
        assert_eq!(account.assign_missing_ids(), None);
    }

    #[test]
    fn assign_missing_ids_refuses_to_fill_the_last_id() {
        let mut account = Account::new(vec![0; SALT_LEN], vec![0; 32]);
        account.entries = vec![entry(u64::MAX - 2), entry(0), entry(0)];
        assert_eq!(account.assign_missing_ids(), None);

        let ids: Vec<EntryId> = account.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![u64::MAX - 2, 0, 0]);
    }

    #[test]
    fn envelope_rejects_bad_salt_length() {
        let mut e = entry(1);
        e.entry_salt = vec![0u8; 4];
        assert!(e.envelope().is_none());
    }

    #[test]
    fn envelope_roundtrips_fields() {
        let env = Envelope {
            ciphertext: "abc".into(),
            salt: [9u8; SALT_LEN],
        };
        let e = Entry::from_envelope(7, env.clone());
        assert_eq!(e.id, 7);
        assert!(e.created_at.is_some());
        assert_eq!(e.envelope(), Some(env));
    }
}

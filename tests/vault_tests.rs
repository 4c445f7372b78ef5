//! Integration tests for the credential store.

use std::fs;

use secure_vault::crypto::seal;
use secure_vault::errors::{AuthError, DecryptError, PersistenceError, VaultError};
use secure_vault::vault::CredentialStore;
use tempfile::TempDir;

/// Helper: a store file path inside a fresh temp dir.
fn store_path() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("data_store.json");
    (dir, path)
}

fn auth_error(err: VaultError) -> AuthError {
    match err {
        VaultError::Auth(e) => e,
        other => panic!("expected an auth error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Registration and login
// ---------------------------------------------------------------------------

#[test]
fn unknown_user_is_registered_and_persisted() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);

    let session = store.register_or_login("alice", b"pw1").expect("register");
    assert!(session.is_new_account());
    assert_eq!(session.username(), "alice");
    assert!(path.exists(), "registration must persist the store");

    // A fresh process sees the account and accepts the password.
    let mut reopened = CredentialStore::open(&path);
    assert!(reopened.contains_user("alice"));
    let session = reopened.register_or_login("alice", b"pw1").expect("login");
    assert!(!session.is_new_account());
}

#[test]
fn wrong_password_does_not_overwrite_account() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    store.register_or_login("alice", b"pw1").unwrap();

    let err = store.register_or_login("alice", b"pw2").unwrap_err();
    assert_eq!(
        auth_error(err),
        AuthError::InvalidCredentials { remaining: 2 }
    );

    // The original password still works.
    let mut reopened = CredentialStore::open(&path);
    assert!(reopened.register_or_login("alice", b"pw1").is_ok());
}

#[test]
fn usernames_are_case_sensitive() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    store.register_or_login("alice", b"pw1").unwrap();

    let session = store.register_or_login("Alice", b"other").unwrap();
    assert!(session.is_new_account());
    assert_eq!(store.account_count(), 2);
}

#[test]
fn stored_verifier_is_not_the_password() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    store.register_or_login("alice", b"hunter2").unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("hunter2"));
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(doc["alice"]["password_salt"].is_string());
    assert!(doc["alice"]["password_hash"].is_string());
    assert_eq!(doc["alice"]["entries"], serde_json::json!([]));
}

#[test]
fn empty_fields_are_rejected_without_counting() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);

    let err = store.register_or_login("", b"pw").unwrap_err();
    assert_eq!(auth_error(err), AuthError::MissingFields);
    let err = store.register_or_login("alice", b"").unwrap_err();
    assert_eq!(auth_error(err), AuthError::MissingFields);

    assert_eq!(store.failed_attempts(), 0);
    assert_eq!(store.account_count(), 0);
    assert!(!path.exists(), "nothing should be written");
}

// ---------------------------------------------------------------------------
// Failed-attempt counter and lockout
// ---------------------------------------------------------------------------

#[test]
fn three_failures_count_down_then_lock_out() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    store.register_or_login("alice", b"right").unwrap();

    let mut remaining = Vec::new();
    for _ in 0..3 {
        match auth_error(store.register_or_login("alice", b"wrong").unwrap_err()) {
            AuthError::InvalidCredentials { remaining: r } => remaining.push(r),
            other => panic!("unexpected error {other:?}"),
        }
    }
    assert_eq!(remaining, vec![2, 1, 0]);
    assert!(store.is_locked_out());

    // Refused outright, even with the right password or a new username.
    let err = store.register_or_login("alice", b"right").unwrap_err();
    assert_eq!(auth_error(err), AuthError::LockedOut);
    let err = store.register_or_login("bob", b"pw").unwrap_err();
    assert_eq!(auth_error(err), AuthError::LockedOut);
    assert!(!store.contains_user("bob"));
}

#[test]
fn counter_is_shared_across_usernames_and_not_reset_by_success() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    store.register_or_login("alice", b"a").unwrap();
    store.register_or_login("bob", b"b").unwrap();

    assert!(store.register_or_login("alice", b"x").is_err());
    store.register_or_login("alice", b"a").unwrap();
    let err = store.register_or_login("bob", b"x").unwrap_err();

    assert_eq!(
        auth_error(err),
        AuthError::InvalidCredentials { remaining: 1 }
    );
    assert_eq!(store.failed_attempts(), 2);
}

#[test]
fn counter_resets_with_a_new_store_instance() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    store.register_or_login("alice", b"right").unwrap();
    for _ in 0..3 {
        let _ = store.register_or_login("alice", b"wrong");
    }
    assert!(store.is_locked_out());

    let mut restarted = CredentialStore::open(&path);
    assert_eq!(restarted.remaining_attempts(), 3);
    assert!(restarted.register_or_login("alice", b"right").is_ok());
}

#[test]
fn custom_attempt_limit() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path).with_max_failed_attempts(1);
    store.register_or_login("alice", b"right").unwrap();

    let err = store.register_or_login("alice", b"wrong").unwrap_err();
    assert_eq!(
        auth_error(err),
        AuthError::InvalidCredentials { remaining: 0 }
    );
    let err = store.register_or_login("alice", b"right").unwrap_err();
    assert_eq!(auth_error(err), AuthError::LockedOut);
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[test]
fn store_and_decrypt_entry_roundtrip() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    let session = store.register_or_login("alice", b"pw").unwrap();

    let id = store
        .store_secret(&session, b"hello world", b"k1")
        .expect("store");
    assert_eq!(id, 1);

    // Survives a reload.
    let mut reopened = CredentialStore::open(&path);
    let session = reopened.register_or_login("alice", b"pw").unwrap();
    let plaintext = reopened.decrypt_entry(&session, id, b"k1").unwrap();
    assert_eq!(plaintext.as_slice(), b"hello world");

    let err = reopened.decrypt_entry(&session, id, b"k2").unwrap_err();
    assert!(matches!(
        err,
        VaultError::Decrypt(DecryptError::AuthenticationFailed)
    ));
}

#[test]
fn entries_keep_insertion_order_and_stable_ids() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    let session = store.register_or_login("alice", b"pw").unwrap();

    let first = store.append_entry(&session, seal(b"one", b"k").unwrap()).unwrap();
    let second = store.append_entry(&session, seal(b"two", b"k").unwrap()).unwrap();
    let third = store.append_entry(&session, seal(b"three", b"k").unwrap()).unwrap();

    let entries = store.list_entries(&session).unwrap();
    let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![first, second, third]);
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(store.entry_count(&session).unwrap(), 3);

    let plaintext = store.decrypt_entry(&session, second, b"k").unwrap();
    assert_eq!(plaintext.as_slice(), b"two");
}

#[test]
fn entries_are_private_to_their_account() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    let alice = store.register_or_login("alice", b"a").unwrap();
    let bob = store.register_or_login("bob", b"b").unwrap();

    let id = store.store_secret(&alice, b"alice's", b"k").unwrap();

    assert!(store.list_entries(&bob).unwrap().is_empty());
    assert!(matches!(
        store.decrypt_entry(&bob, id, b"k"),
        Err(VaultError::EntryNotFound(1))
    ));
}

#[test]
fn unknown_entry_id_is_not_found() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    let session = store.register_or_login("alice", b"pw").unwrap();

    assert!(matches!(
        store.decrypt_entry(&session, 42, b"k"),
        Err(VaultError::EntryNotFound(42))
    ));
}

#[test]
fn empty_passkey_is_missing_field() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    let session = store.register_or_login("alice", b"pw").unwrap();

    let err = store.store_secret(&session, b"data", b"").unwrap_err();
    assert_eq!(auth_error(err), AuthError::MissingFields);
    assert_eq!(store.entry_count(&session).unwrap(), 0);
}

#[test]
fn tampered_entry_on_disk_fails_to_decrypt() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    let session = store.register_or_login("alice", b"pw").unwrap();
    store.store_secret(&session, b"secret", b"k").unwrap();

    // Swap one character of the stored ciphertext.
    let mut doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let ct = doc["alice"]["entries"][0]["encrypted_data"]
        .as_str()
        .unwrap()
        .to_string();
    let mut chars: Vec<char> = ct.chars().collect();
    chars[20] = if chars[20] == 'A' { 'B' } else { 'A' };
    doc["alice"]["entries"][0]["encrypted_data"] =
        serde_json::Value::String(chars.into_iter().collect());
    fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

    let mut reopened = CredentialStore::open(&path);
    let session = reopened.register_or_login("alice", b"pw").unwrap();
    assert!(matches!(
        reopened.decrypt_entry(&session, 1, b"k"),
        Err(VaultError::Decrypt(DecryptError::AuthenticationFailed))
    ));
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn pbkdf2_account_is_not_accepted_or_overwritten() {
    let (_dir, path) = store_path();
    // PBKDF2-HMAC-SHA256, 100 000 rounds, password "pw", salt [7; 16].
    let legacy = r#"{
        "alice": {
            "password_salt": "BwcHBwcHBwcHBwcHBwcHBw==",
            "password_hash": "QV1a37P9oTvZU-YA5CatO9NkG8aKp7juTf292W03WdY=",
            "entries": []
        }
    }"#;
    fs::write(&path, legacy).unwrap();

    let mut store = CredentialStore::open(&path);
    assert!(store.contains_user("alice"));

    let err = store.register_or_login("alice", b"pw").unwrap_err();
    assert_eq!(
        auth_error(err),
        AuthError::InvalidCredentials { remaining: 2 }
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), legacy);
}

#[test]
fn missing_file_opens_empty() {
    let (_dir, path) = store_path();
    let store = CredentialStore::open(&path);
    assert_eq!(store.account_count(), 0);
}

#[test]
fn corrupt_file_opens_empty() {
    let (_dir, path) = store_path();
    fs::write(&path, b"\x00\x01 definitely not json").unwrap();

    let mut store = CredentialStore::open(&path);
    assert_eq!(store.account_count(), 0);

    // The next mutation replaces the corrupt file with a valid one.
    store.register_or_login("alice", b"pw").unwrap();
    let reopened = CredentialStore::open(&path);
    assert!(reopened.contains_user("alice"));
}

#[test]
fn failed_save_is_surfaced_and_rolled_back() {
    let dir = TempDir::new().unwrap();
    // A regular file where the store's directory should be.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"x").unwrap();
    let path = blocker.join("data_store.json");

    let mut store = CredentialStore::open(&path);
    let err = store.register_or_login("alice", b"pw").unwrap_err();

    assert!(matches!(
        err,
        VaultError::Persistence(PersistenceError::WriteFailed { .. })
    ));
    assert!(!store.contains_user("alice"));
}

#[test]
fn failed_append_is_surfaced_and_rolled_back() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    let session = store.register_or_login("alice", b"pw").unwrap();

    // A directory where the store file is makes the final rename fail.
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    let err = store
        .append_entry(&session, seal(b"lost", b"k").unwrap())
        .unwrap_err();

    assert!(matches!(
        err,
        VaultError::Persistence(PersistenceError::WriteFailed { .. })
    ));
    assert_eq!(store.entry_count(&session).unwrap(), 0);
    assert!(store.list_entries(&session).unwrap().is_empty());
}

#[test]
fn stale_session_is_rejected() {
    let (_dir, path) = store_path();
    let mut store = CredentialStore::open(&path);
    let session = store.register_or_login("alice", b"pw").unwrap();

    // A different store file where the account was never created.
    let other_dir = TempDir::new().unwrap();
    let other = CredentialStore::open(&other_dir.path().join("other.json"));

    let err = other.list_entries(&session).unwrap_err();
    assert_eq!(auth_error(err), AuthError::UnknownSession("alice".into()));
}

//! JSON store document and atomic whole-file persistence.
//!
//! The store file is a single JSON object keyed by username:
//!
//! ```text
//! {
//!   "alice": {
//!     "password_salt": "<base64url>",
//!     "password_hash": "<base64url>",
//!     "entries": [ { "id": 1, "encrypted_data": "...", "entry_salt": "..." } ]
//!   }
//! }
//! ```
//!
//! Every save rewrites the whole document.  Loading never fails: a
//! missing, unreadable or malformed file yields an empty store.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::account::Account;
use crate::errors::PersistenceError;

/// Username -> account, ordered so saved files diff cleanly.
pub type StoreDocument = BTreeMap<String, Account>;

/// Load the store document at `path`, falling back to an empty store.
///
/// Entries written before ids existed are numbered here.
pub fn load(path: &Path) -> StoreDocument {
    match try_load(path) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(error = %e, "starting with an empty store");
            StoreDocument::new()
        }
    }
}

/// Load the store document, reporting why it could not be read.
///
/// A missing file is not an error and returns an empty document.
pub fn try_load(path: &Path) -> Result<StoreDocument, PersistenceError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no store file yet");
        return Ok(StoreDocument::new());
    }

    let unreadable = |reason: String| PersistenceError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    let data = fs::read(path).map_err(|e| unreadable(e.to_string()))?;
    let mut doc: StoreDocument =
        serde_json::from_slice(&data).map_err(|e| unreadable(e.to_string()))?;

    for (username, account) in doc.iter_mut() {
        account
            .assign_missing_ids()
            .ok_or_else(|| unreadable(format!("entry ids of '{username}' are exhausted")))?;
    }

    tracing::debug!(path = %path.display(), accounts = doc.len(), "loaded store");
    Ok(doc)
}

/// Write the store document to disk **atomically**.
///
/// 1. Serialize the document to pretty JSON.
/// 2. Write it to a temp file in the same directory and flush it.
/// 3. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file.
pub fn save(path: &Path, doc: &StoreDocument) -> Result<(), PersistenceError> {
    let write_failed = |reason: String| PersistenceError::WriteFailed {
        path: path.to_path_buf(),
        reason,
    };

    let buf = serde_json::to_vec_pretty(doc).map_err(|e| write_failed(e.to_string()))?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;

    let tmp_path = temp_path(parent, path);
    write_private(&tmp_path, &buf).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        write_failed(e.to_string())
    })?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        write_failed(e.to_string())
    })?;

    tracing::debug!(path = %path.display(), accounts = doc.len(), "saved store");
    Ok(())
}

/// `<dir>/.<file name>.tmp`, in the same directory so rename stays on
/// one filesystem.
fn temp_path(parent: &Path, path: &Path) -> PathBuf {
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// Create `path` owner-only and write `buf` durably.
///
/// A leftover file at `path` is removed first so the new file always
/// gets the restrictive mode.
fn write_private(path: &Path, buf: &[u8]) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed stale temp file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(buf)?;
    file.sync_all()
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::URL_SAFE as BASE64_URL;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64_URL.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64_URL.decode(&s).map_err(serde::de::Error::custom)
}

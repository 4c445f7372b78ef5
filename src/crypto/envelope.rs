//! Passkey envelopes: one blob sealed under a key derived from a
//! user-supplied passkey and a salt of its own.
//!
//! The ciphertext is kept as URL-safe base64 text so it can be shown to
//! the user and stored in the JSON document as-is.

use base64::engine::general_purpose::URL_SAFE as BASE64_URL;
use base64::Engine;
use zeroize::Zeroizing;

use super::encryption::{decrypt, encrypt};
use super::kdf::{derive_key_with_params, generate_salt, KdfParams, SALT_LEN};
use crate::errors::{AuthError, DecryptError, Result, VaultError};

/// A sealed blob plus the salt its key was derived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// `base64url(nonce || ciphertext || tag)`.
    pub ciphertext: String,
    /// Per-entry KDF salt.
    pub salt: [u8; SALT_LEN],
}

/// Seal `plaintext` under `passkey` with the default KDF parameters.
pub fn seal(plaintext: &[u8], passkey: &[u8]) -> Result<Envelope> {
    seal_with_params(plaintext, passkey, &KdfParams::DEFAULT)
}

/// Seal `plaintext` under `passkey` with explicit KDF parameters.
///
/// A fresh salt and a fresh nonce are drawn for every call, so sealing
/// the same input twice never yields the same envelope.
pub fn seal_with_params(plaintext: &[u8], passkey: &[u8], params: &KdfParams) -> Result<Envelope> {
    if passkey.is_empty() {
        return Err(AuthError::MissingFields.into());
    }

    let salt = generate_salt()?;
    let key = derive_key_with_params(passkey, &salt, params)?;
    let sealed = encrypt(&key, plaintext)?;

    Ok(Envelope {
        ciphertext: BASE64_URL.encode(sealed),
        salt,
    })
}

/// Open an envelope with the default KDF parameters.
pub fn open(envelope: &Envelope, passkey: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    open_with_params(envelope, passkey, &KdfParams::DEFAULT)
}

/// Open an envelope with explicit KDF parameters.
///
/// Wrong passkeys, tampered ciphertext and undecodable text all fail
/// with `DecryptError::AuthenticationFailed`.
pub fn open_with_params(
    envelope: &Envelope,
    passkey: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<Vec<u8>>> {
    if passkey.is_empty() {
        return Err(AuthError::MissingFields.into());
    }

    let sealed = BASE64_URL
        .decode(envelope.ciphertext.as_bytes())
        .map_err(|_| VaultError::Decrypt(DecryptError::AuthenticationFailed))?;

    let key = derive_key_with_params(passkey, &envelope.salt, params)?;
    let plaintext = decrypt(&key, &sealed)?;

    Ok(Zeroizing::new(plaintext))
}

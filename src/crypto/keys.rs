//! The derived key type shared by password verification and entry
//! encryption.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Length of derived keys (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A 32-byte key produced by the KDF that zeroes its memory when
/// dropped.
///
/// Account verifiers and per-entry encryption keys are both
/// `DerivedKey`s.  Compare them with `ct_eq`, never with `==`.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Create a new `DerivedKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// An all-zero key, to be filled in by the KDF.
    pub(crate) fn zeroed() -> Self {
        Self {
            bytes: [0u8; KEY_LEN],
        }
    }

    /// Rebuild a key from a stored byte slice.
    ///
    /// Returns `None` when the slice is not exactly `KEY_LEN` bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; KEY_LEN] = bytes.try_into().ok()?;
        Some(Self { bytes })
    }

    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; KEY_LEN] {
        &mut self.bytes
    }

    /// Constant-time equality.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

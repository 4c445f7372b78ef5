//! Authenticated session handle.

/// Proof that `register_or_login` succeeded for a username.
///
/// A session is only a key into the store: it holds no credential
/// material.  It can only be created by `CredentialStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    new_account: bool,
}

impl Session {
    pub(crate) fn new(username: &str, new_account: bool) -> Self {
        Self {
            username: username.to_string(),
            new_account,
        }
    }

    /// The authenticated username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// `true` when this login provisioned the account.
    pub fn is_new_account(&self) -> bool {
        self.new_account
    }
}

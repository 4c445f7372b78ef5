//! `secure-vault retrieve` — decrypt one entry and print it.

use crate::cli::{audit, login, open_store, output, prompt_passkey, Cli};
use crate::errors::Result;
use crate::vault::{CredentialStore, EntryId, Session};

/// Execute the `retrieve` command.
pub fn execute(cli: &Cli, id: EntryId) -> Result<()> {
    let mut store = open_store(cli)?;
    let session = login(cli, &mut store)?;
    retrieve_entry(&store, &session, id)
}

/// Prompt for the passkey and print the plaintext of entry `id`.
/// Shared with the interactive shell.
pub fn retrieve_entry(store: &CredentialStore, session: &Session, id: EntryId) -> Result<()> {
    // Look the entry up first so a bad id does not cost a passkey prompt.
    store.entry(session, id)?;

    let passkey = prompt_passkey(false)?;

    match store.decrypt_entry(session, id, passkey.as_bytes()) {
        Ok(plaintext) => {
            audit(store.path(), "retrieve", session.username(), Some(id), None);
            output::success("Decrypted successfully!");
            println!("{}", String::from_utf8_lossy(&plaintext));
            Ok(())
        }
        Err(e) => {
            audit(store.path(), "retrieve-failed", session.username(), Some(id), None);
            Err(e)
        }
    }
}

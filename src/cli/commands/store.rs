//! `secure-vault store` — encrypt a secret with a passkey and save it.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{audit, login, open_store, prompt_passkey, Cli};
use crate::errors::{AuthError, Result, VaultError};
use crate::vault::{CredentialStore, Session};

/// Execute the `store` command.
pub fn execute(cli: &Cli, data: Option<&str>) -> Result<()> {
    // Determine the secret data from one of three sources.
    let secret = if let Some(d) = data {
        // Source 1: Inline value on the command line.
        output::warning("Data provided on command line — it may appear in shell history.");
        Zeroizing::new(d.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed_len = buf.trim_end().len();
        buf.truncate(trimmed_len);
        buf
    } else {
        // Source 3: Interactive prompt.
        read_data()?
    };

    let mut store = open_store(cli)?;
    let session = login(cli, &mut store)?;
    store_secret(&mut store, &session, &secret)?;

    output::tip("Retrieve it later with: secure-vault retrieve <ID>");
    Ok(())
}

/// Prompt for the secret text.
pub fn read_data() -> Result<Zeroizing<String>> {
    let data = dialoguer::Input::<String>::new()
        .with_prompt("Your data")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(data))
}

/// Seal `data` under a prompted passkey, append it, and report the new
/// entry.  Shared with the interactive shell.
pub fn store_secret(store: &mut CredentialStore, session: &Session, data: &str) -> Result<()> {
    if data.is_empty() {
        return Err(AuthError::MissingFields.into());
    }

    let passkey = prompt_passkey(true)?;
    let id = store.store_secret(session, data.as_bytes(), passkey.as_bytes())?;

    audit(store.path(), "store", session.username(), Some(id), None);

    let entry = store.entry(session, id)?;

    output::success(&format!("Data encrypted and saved as entry #{id}."));
    println!("{}", entry.encrypted_data);

    Ok(())
}

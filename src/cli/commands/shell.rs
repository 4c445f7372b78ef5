//! `secure-vault shell` — interactive session.
//!
//! Logs in once, then loops over a menu until the user logs out.
//! Errors from individual actions are printed and the session carries
//! on; only login failures end it.

use dialoguer::Select;

use crate::cli::commands::{retrieve, store};
use crate::cli::output;
use crate::cli::{login, open_store, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::{CredentialStore, EntryId, Session};

/// Menu entries, in display order.
const MENU: [&str; 5] = [
    "Dashboard",
    "Store Data",
    "Retrieve Data",
    "List Entries",
    "Logout",
];

/// Execute the `shell` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut vault = open_store(cli)?;
    let session = login(cli, &mut vault)?;

    loop {
        let choice = Select::new()
            .with_prompt(format!("{} — choose an action", session.username()))
            .items(&MENU)
            .default(0)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("menu: {e}")))?;

        let result = match choice {
            0 => vault
                .entry_count(&session)
                .map(|count| output::print_dashboard(session.username(), count)),
            1 => store::read_data()
                .and_then(|data| store::store_secret(&mut vault, &session, &data)),
            2 => pick_entry(&vault, &session).and_then(|picked| match picked {
                Some(id) => retrieve::retrieve_entry(&vault, &session, id),
                None => Ok(()),
            }),
            3 => vault
                .list_entries(&session)
                .map(|entries| output::print_entries_table(&entries)),
            _ => {
                output::success("Logged out.");
                return Ok(());
            }
        };

        if let Err(e) = result {
            output::error(&e.to_string());
        }
    }
}

/// Let the user pick one of their entries.  `None` when there are none.
fn pick_entry(vault: &CredentialStore, session: &Session) -> Result<Option<EntryId>> {
    let entries = vault.list_entries(session)?;
    if entries.is_empty() {
        output::info("No secrets stored yet.");
        return Ok(None);
    }

    let labels: Vec<String> = entries
        .iter()
        .map(|e| format!("#{}  {}", e.id, output::preview(&e.encrypted_data)))
        .collect();

    let index = Select::new()
        .with_prompt("Which entry?")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("entry picker: {e}")))?;

    Ok(entries.get(index).map(|e| e.id))
}

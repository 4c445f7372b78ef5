//! `secure-vault login` — log in, creating the account on first use.

use crate::cli::output;
use crate::cli::{login, open_store, Cli};
use crate::errors::Result;

/// Execute the `login` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut store = open_store(cli)?;
    let session = login(cli, &mut store)?;

    let count = store.entry_count(&session)?;
    output::info(&format!("{count} secret(s) stored."));
    output::tip("Run `secure-vault shell` for an interactive session.");

    Ok(())
}

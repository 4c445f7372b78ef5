//! `secure-vault dashboard` — summary of the logged-in user's vault.

use crate::cli::output;
use crate::cli::{login, open_store, Cli};
use crate::errors::Result;

/// Execute the `dashboard` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut store = open_store(cli)?;
    let session = login(cli, &mut store)?;

    output::print_dashboard(session.username(), store.entry_count(&session)?);

    Ok(())
}

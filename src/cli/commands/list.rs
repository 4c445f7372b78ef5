//! `secure-vault list` — display your entries in a table.

use crate::cli::output;
use crate::cli::{login, open_store, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut store = open_store(cli)?;
    let session = login(cli, &mut store)?;

    let entries = store.list_entries(&session)?;

    output::info(&format!(
        "{} — {} secret(s)",
        session.username(),
        entries.len()
    ));

    output::print_entries_table(&entries);

    Ok(())
}

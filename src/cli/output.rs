//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::Entry;

/// Characters of ciphertext shown in listings.
const PREVIEW_LEN: usize = 24;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Shorten a ciphertext for display.
pub fn preview(ciphertext: &str) -> String {
    match ciphertext.char_indices().nth(PREVIEW_LEN) {
        Some((cut, _)) => format!("{}\u{2026}", &ciphertext[..cut]),
        None => ciphertext.to_string(),
    }
}

/// Print a table of entries (Id, Created, Ciphertext).
pub fn print_entries_table(entries: &[Entry]) {
    if entries.is_empty() {
        info("No secrets stored yet.");
        tip("Run `secure-vault store` to add your first secret.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Created", "Ciphertext"]);

    for e in entries {
        let created = e
            .created_at
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string());
        table.add_row(vec![e.id.to_string(), created, preview(&e.encrypted_data)]);
    }

    println!("{table}");
}

/// Print the dashboard card for a user.
pub fn print_dashboard(username: &str, total: usize) {
    println!();
    println!("{}", style("Secure Data Vault").cyan().bold());
    println!("{} {}", style("Welcome,").dim(), style(username).bold());
    println!();

    let mut table = Table::new();
    table.set_header(vec!["Total Secrets"]);
    table.add_row(vec![total.to_string()]);
    println!("{table}");
}

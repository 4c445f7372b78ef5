//! CLI module — Clap argument parser, prompts, output helpers, and
//! command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{AuthError, Result, VaultError};
use crate::vault::{CredentialStore, Session};

/// Environment variable holding the account password (CI / scripting).
pub const PASSWORD_ENV: &str = "SECURE_VAULT_PASSWORD";

/// Environment variable holding the entry passkey (CI / scripting).
pub const PASSKEY_ENV: &str = "SECURE_VAULT_PASSKEY";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SECURE_VAULT_LOG";

/// Secure Vault CLI: store and retrieve passkey-encrypted secrets.
#[derive(Parser)]
#[command(
    name = "secure-vault",
    about = "Personal secret vault with per-entry passkey encryption",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Username to log in as (prompted if omitted)
    #[arg(short, long, env = "SECURE_VAULT_USER", global = true)]
    pub user: Option<String>,

    /// Store file (default: data_file from .secure-vault.toml, or data_store.json)
    #[arg(long, global = true)]
    pub data_file: Option<String>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Log in, creating the account if the username is new
    Login,

    /// Encrypt a secret with a passkey and save it
    Store {
        /// Secret data (omit for piped stdin or an interactive prompt)
        data: Option<String>,
    },

    /// Decrypt a stored secret by its entry id
    Retrieve {
        /// Entry id as shown by `list`
        id: u64,
    },

    /// List your stored entries
    List,

    /// Show a summary of your vault
    Dashboard,

    /// Start an interactive session
    Shell,

    /// View the audit log of vault operations
    #[cfg(feature = "audit-log")]
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Install the stderr log subscriber.
///
/// `--verbose` forces `debug`; otherwise `SECURE_VAULT_LOG` is used as
/// an `EnvFilter` directive, defaulting to `warn`.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Load `.secure-vault.toml` and resolve the store file path, with
/// `--data-file` taking precedence over `data_file`.
fn resolve_settings(cli: &Cli) -> Result<(Settings, PathBuf)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let path = match &cli.data_file {
        Some(file) => cwd.join(file),
        None => settings.data_path(&cwd),
    };
    Ok((settings, path))
}

/// Resolve the store file path for this invocation.
pub fn data_path(cli: &Cli) -> Result<PathBuf> {
    resolve_settings(cli).map(|(_, path)| path)
}

/// Open the credential store configured for this invocation.
pub fn open_store(cli: &Cli) -> Result<CredentialStore> {
    let (settings, path) = resolve_settings(cli)?;
    Ok(CredentialStore::open(&path).with_max_failed_attempts(settings.max_failed_attempts))
}

/// Get the username from `--user` / `SECURE_VAULT_USER` or a prompt.
pub fn prompt_username(cli: &Cli) -> Result<String> {
    if let Some(user) = &cli.user {
        return Ok(user.clone());
    }

    dialoguer::Input::<String>::new()
        .with_prompt("Username")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("username prompt: {e}")))
}

/// Get the account password, trying in order:
/// 1. `SECURE_VAULT_PASSWORD` env var (CI/CD)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Get an entry passkey from `SECURE_VAULT_PASSKEY` or a prompt.
///
/// With `confirm`, the prompt asks twice (used when sealing, where a
/// typo would make the entry unrecoverable).
pub fn prompt_passkey(confirm: bool) -> Result<Zeroizing<String>> {
    if let Ok(key) = std::env::var(PASSKEY_ENV) {
        if !key.is_empty() {
            return Ok(Zeroizing::new(key));
        }
    }

    let mut prompt = dialoguer::Password::new()
        .with_prompt(if confirm {
            "Encryption key"
        } else {
            "Decryption key"
        })
        .allow_empty_password(true);
    if confirm {
        prompt = prompt.with_confirmation("Confirm encryption key", "Keys do not match, try again");
    }

    let key = prompt
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("passkey prompt: {e}")))?;
    Ok(Zeroizing::new(key))
}

/// Register or log in, re-prompting on a wrong password until the
/// store locks out.
///
/// When the password comes from `SECURE_VAULT_PASSWORD` there is no
/// retry: the first failure is returned.
pub fn login(cli: &Cli, store: &mut CredentialStore) -> Result<Session> {
    let data_path = store.path().to_path_buf();
    let username = prompt_username(cli)?;
    let interactive = std::env::var_os(PASSWORD_ENV).map_or(true, |v| v.is_empty());

    loop {
        if store.is_locked_out() {
            audit(&data_path, "locked-out", &username, None, None);
            return Err(AuthError::LockedOut.into());
        }

        let password = prompt_password()?;

        match store.register_or_login(&username, password.as_bytes()) {
            Ok(session) => {
                if session.is_new_account() {
                    audit(&data_path, "register", &username, None, Some("account created"));
                    output::success("Account created! Logged in.");
                } else {
                    audit(&data_path, "login", &username, None, None);
                    output::success(&format!("Welcome back, {username}!"));
                }
                return Ok(session);
            }
            Err(VaultError::Auth(AuthError::InvalidCredentials { remaining })) if interactive => {
                audit(&data_path, "login-failed", &username, None, None);
                output::error(&AuthError::InvalidCredentials { remaining }.to_string());
            }
            Err(e) => {
                if matches!(e, VaultError::Auth(AuthError::InvalidCredentials { .. })) {
                    audit(&data_path, "login-failed", &username, None, None);
                }
                return Err(e);
            }
        }
    }
}

/// Record an audit event next to the store file.
///
/// A no-op when the crate is built without the `audit-log` feature.
pub fn audit(
    data_path: &std::path::Path,
    op: &str,
    username: &str,
    entry_id: Option<u64>,
    details: Option<&str>,
) {
    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(data_path, op, username, entry_id, details);

    #[cfg(not(feature = "audit-log"))]
    let _ = (data_path, op, username, entry_id, details);
}

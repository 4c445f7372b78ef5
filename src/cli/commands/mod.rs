//! One module per subcommand.

#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod completions;
pub mod dashboard;
pub mod list;
pub mod login;
pub mod retrieve;
pub mod shell;
pub mod store;

//! Subcommand implementations.

pub mod evaluate;
pub mod init;
pub mod list_rules;
pub mod output;

//! Subcommand implementations.

pub mod config;
pub mod login;
pub mod probe;
pub mod relay;
pub mod rides;

//! Subcommands.

pub mod changelog;
pub mod release;
pub mod version;

mod options;

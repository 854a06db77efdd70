//! Safezone CLI library.
//!
//! Terminal styling, output rendering and the subcommand handlers behind the
//! `safezone-cli` binary.

pub mod commands;
pub mod output;
pub mod terminal;

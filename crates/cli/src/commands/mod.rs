//! Top level subcommands

pub(crate) mod command;
pub(crate) mod run;

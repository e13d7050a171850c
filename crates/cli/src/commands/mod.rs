//! `sd-cli` subcommands.

pub mod migrate;
pub mod report;
pub mod seed;

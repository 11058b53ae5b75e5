//! Utility modules shared by the synchronizer and the CLI.

pub mod exec;
pub mod path;

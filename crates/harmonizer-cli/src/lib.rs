//! Library side of the `harmonizer` binary: argument types, commands,
//! summary tables and logging setup.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;

//! Core of the `minicore` shell: an in-memory filesystem, a command
//! interpreter over it and a small process table, plus the session
//! configuration and snapshot storage the terminal front end uses.

pub mod commands;
pub mod config;
pub mod ext;
pub mod filesystem;
pub mod parser;
pub mod persistence;
pub mod process;
pub mod shell;

//! Command-line interface support
//!
//! The binary parses arguments with clap and hands a [`RunArgs`] to [`run`].

pub mod commands;

pub use commands::{Command, RunArgs, execute, init_logging, run};

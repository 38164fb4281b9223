//! sfconv CLI library.
//!
//! Argument parsing, flag resolution and the dump/convert commands behind
//! the `sfconv` binary.

pub mod cli_args;
pub mod commands;

pub use cli_args::{Cli, Plan, PlanError};
pub use commands::{run, Exit};

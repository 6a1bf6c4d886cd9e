#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod error;
pub mod play;
pub mod render;
pub mod script;
pub mod session;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{CliError, Result};

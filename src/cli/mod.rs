//! Command-line interface module.

mod args;
pub mod compile;
pub mod resolve;
pub mod serve;

pub use args::{Cli, Commands, ResolveArgs};

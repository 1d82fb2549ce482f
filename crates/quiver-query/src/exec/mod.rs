//! The pull-based streaming executor.

mod executor;
mod state;

pub use executor::{ExecOptions, Executor};

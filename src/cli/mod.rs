//! CLI module
//!
//! Command-line interface for partitioned, resumable trie walks.
//!
//! # Commands
//!
//! - `paths` - Print the path ranges a prefix splits into
//! - `inspect` - Print the rows of the recovery file
//! - `walk` - Traverse a trie built from a key file, resuming a previous run

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{Runner, WalkSummary};

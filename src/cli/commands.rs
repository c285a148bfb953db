//! CLI commands and argument parsing

use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Resumable, partitioned trie traversal
#[derive(Parser, Debug)]
#[command(name = "trie-tracker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Recovery file, overrides the configured one
    #[arg(short, long, global = true)]
    pub recovery_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Log level
    #[arg(long, global = true, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Verbose output (same as --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Level the log subscriber should be installed with
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            self.log_level.into()
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the path ranges a prefix splits into
    Paths {
        /// Prefix to split, one hex digit per nibble
        #[arg(long)]
        prefix: Option<String>,

        /// Number of partitions (power of two)
        #[arg(long)]
        bins: Option<usize>,
    },

    /// Print the rows of the recovery file
    Inspect,

    /// Traverse a trie built from a key file, resuming from the recovery file
    Walk {
        /// File with one hex-encoded leaf key per line
        #[arg(long)]
        keys: PathBuf,

        /// Prefix to traverse under, one hex digit per nibble
        #[arg(long)]
        prefix: Option<String>,

        /// Number of partitions for a fresh walk
        #[arg(long)]
        bins: Option<usize>,

        /// Stop after visiting this many nodes in total
        #[arg(long)]
        stop_after: Option<usize>,
    },
}

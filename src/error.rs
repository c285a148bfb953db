//! Error types for trie-tracker
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for trie-tracker
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // Path Errors
    // ============================================================================
    #[error("Invalid nibble 0x{value:02x} at index {index}")]
    InvalidNibble { index: usize, value: u8 },

    #[error("Path of odd length {len} cannot be packed into key bytes")]
    OddPathLength { len: usize },

    #[error("Invalid hex path '{input}': {message}")]
    InvalidHex { input: String, message: String },

    // ============================================================================
    // Partition Errors
    // ============================================================================
    #[error("Partition count must be a non-zero power of two, got {nbins}")]
    InvalidPartitionCount { nbins: usize },

    #[error("Cannot split prefix of length {prefix_len} into {nbins} partitions")]
    PartitionTooDeep { prefix_len: usize, nbins: usize },

    // ============================================================================
    // Tracker Errors
    // ============================================================================
    #[error("Tracker is closed")]
    TrackerClosed,

    #[error("Malformed recovery row at line {line}: {message}")]
    RecoveryRow { line: usize, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid hex error
    pub fn invalid_hex(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHex {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a recovery row error
    pub fn recovery_row(line: usize, message: impl Into<String>) -> Self {
        Self::RecoveryRow {
            line,
            message: message.into(),
        }
    }

    /// Check if this error was caused by a closed tracker
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::TrackerClosed)
    }
}

/// Result type alias for trie-tracker
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

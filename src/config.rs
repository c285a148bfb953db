//! Configuration types
//!
//! Tracker and traversal settings, loadable from YAML:
//!
//! ```yaml
//! prefix: "3a"
//! bins: 16
//! tracker:
//!   recovery_file: state/recovery.csv
//!   capacity: 64
//! ```

use crate::error::{Error, Result};
use crate::path::parse_nibbles;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Tracker Config
// ============================================================================

/// Settings for a [`crate::tracker::Tracker`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// File unfinished cursor positions are saved to
    #[serde(default = "default_recovery_file")]
    pub recovery_file: PathBuf,

    /// Capacity of the registration and completion queues; must be at least
    /// the number of cursors alive at once
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            recovery_file: default_recovery_file(),
            capacity: default_capacity(),
        }
    }
}

impl TrackerConfig {
    /// Validate the tracker settings
    pub fn validate(&self) -> Result<()> {
        if self.recovery_file.as_os_str().is_empty() {
            return Err(Error::invalid_value("recovery_file", "must not be empty"));
        }
        if self.capacity == 0 {
            return Err(Error::invalid_value("capacity", "must be greater than zero"));
        }
        Ok(())
    }
}

fn default_recovery_file() -> PathBuf {
    PathBuf::from("recovery.csv")
}

fn default_capacity() -> usize {
    1024
}

// ============================================================================
// Walk Config
// ============================================================================

/// Settings for a partitioned, tracked traversal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Key prefix to traverse under, one hex digit per nibble
    #[serde(default)]
    pub prefix: String,

    /// Number of partitions (power of two)
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Tracker settings
    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl WalkConfig {
    /// Prefix as a nibble path
    pub fn prefix_path(&self) -> Result<Vec<u8>> {
        parse_nibbles(&self.prefix)
    }

    /// Validate the traversal settings
    pub fn validate(&self) -> Result<()> {
        self.prefix_path()
            .map_err(|e| Error::invalid_value("prefix", e.to_string()))?;
        if self.bins == 0 || !self.bins.is_power_of_two() {
            return Err(Error::invalid_value(
                "bins",
                format!("{} is not a power of two", self.bins),
            ));
        }
        self.tracker.validate()?;
        if self.bins > self.tracker.capacity {
            return Err(Error::invalid_value(
                "capacity",
                format!(
                    "{} is smaller than the {} cursors of a walk",
                    self.tracker.capacity, self.bins
                ),
            ));
        }
        Ok(())
    }
}

fn default_bins() -> usize {
    1
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a walk configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<WalkConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Load and validate a walk configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<WalkConfig> {
    let config: WalkConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

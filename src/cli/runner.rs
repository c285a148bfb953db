//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{load_config, WalkConfig};
use crate::cursor::{Cursor, MemoryTrie};
use crate::error::{Error, Result, ResultExt};
use crate::partition::{make_ranges, subtrie_cursors};
use crate::path::format_nibbles;
use crate::tracker::{read_recovery_file, Tracker};
use crate::types::OutputFormat;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of a `walk` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkSummary {
    /// Whether cursors were restored from a recovery file
    pub restored: bool,
    /// Number of cursors driven
    pub cursors: usize,
    /// Nodes visited in this run
    pub visited: usize,
    /// Cursors checkpointed to the recovery file
    pub saved: usize,
    /// Cursors that ran to completion
    pub finished: usize,
    /// Whether the whole walk is done
    pub complete: bool,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
    stop: Arc<AtomicBool>,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that makes running cursors stop at their next step
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Paths { prefix, bins } => self.paths(prefix.as_deref(), *bins),
            Commands::Inspect => self.inspect(),
            Commands::Walk {
                keys,
                prefix,
                bins,
                stop_after,
            } => {
                let summary = self
                    .walk(keys, prefix.as_deref(), *bins, *stop_after)
                    .await?;
                self.output_message(&json!({
                    "type": "WALK",
                    "summary": summary
                }))
            }
        }
    }

    /// Load configuration, with command-line flags taking precedence
    pub fn load_config(&self, prefix: Option<&str>, bins: Option<usize>) -> Result<WalkConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => WalkConfig::default(),
        };

        if let Some(prefix) = prefix {
            config.prefix = prefix.to_string();
        }
        if let Some(bins) = bins {
            config.bins = bins;
        }
        if let Some(path) = &self.cli.recovery_file {
            config.tracker.recovery_file.clone_from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Print partition ranges
    fn paths(&self, prefix: Option<&str>, bins: Option<usize>) -> Result<()> {
        let config = self.load_config(prefix, bins)?;
        let ranges = make_ranges(&config.prefix_path()?, config.bins)?;

        let ranges: Vec<Value> = ranges
            .iter()
            .map(|range| {
                json!({
                    "lower": format_nibbles(&range.lower),
                    "upper": range.upper().map(format_nibbles)
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "PATHS",
            "prefix": config.prefix,
            "bins": config.bins,
            "ranges": ranges
        }))
    }

    /// Print recovery file rows
    fn inspect(&self) -> Result<()> {
        let config = self.load_config(None, None)?;
        let file = &config.tracker.recovery_file;
        let records = read_recovery_file(file)?;

        let rows: Vec<Value> = records
            .iter()
            .map(|record| {
                json!({
                    "start": format_nibbles(&record.start),
                    "end": record.end.as_deref().map(format_nibbles)
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "RECOVERY",
            "file": file.display().to_string(),
            "rows": rows
        }))
    }

    /// Traverse the trie built from `keys`
    ///
    /// Resumes from the recovery file when one exists, otherwise partitions
    /// the prefix into fresh bins. Each cursor runs on its own blocking task
    /// until it is exhausted, the node budget runs out, or Ctrl-C is pressed;
    /// unfinished cursors are then checkpointed.
    pub async fn walk(
        &self,
        keys: &Path,
        prefix: Option<&str>,
        bins: Option<usize>,
        stop_after: Option<usize>,
    ) -> Result<WalkSummary> {
        let config = self.load_config(prefix, bins)?;
        let trie = load_trie(keys)?;
        info!(keys = %keys.display(), nodes = trie.len(), "Loaded trie");

        let pending = read_recovery_file(&config.tracker.recovery_file)?.len();
        if pending > config.tracker.capacity {
            return Err(Error::invalid_value(
                "capacity",
                format!(
                    "{} is smaller than the {pending} saved cursors",
                    config.tracker.capacity
                ),
            ));
        }

        let tracker = Tracker::from_config(&config.tracker);
        let mut cursors = tracker.restore(|key| trie.cursor(key))?;
        let restored = !cursors.is_empty();
        if restored {
            info!(cursors = cursors.len(), "Resuming from recovery file");
        } else {
            let prefix = config.prefix_path()?;
            for bin in subtrie_cursors(|key| trie.cursor(key), &prefix, config.bins)? {
                cursors.push(tracker.tracked(bin)?);
            }
            info!(cursors = cursors.len(), "Starting fresh walk");
        }

        let interrupt = {
            let stop = Arc::clone(&self.stop);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, stopping cursors");
                    stop.store(true, Ordering::SeqCst);
                }
            })
        };

        self.stop.store(false, Ordering::SeqCst);
        let started = Instant::now();
        let budget = stop_after.map(|n| Arc::new(AtomicUsize::new(n)));
        let count = cursors.len();
        let handles: Vec<_> = cursors
            .into_iter()
            .map(|mut cursor| {
                let stop = Arc::clone(&self.stop);
                let budget = budget.clone();
                tokio::task::spawn_blocking(move || {
                    let visited = drive(&mut cursor, &stop, budget.as_deref());
                    debug!(cursor = %cursor.id(), visited, "Cursor stopped");
                    visited
                })
            })
            .collect();

        let mut visited = 0;
        for result in join_all(handles).await {
            visited += result.map_err(|e| Error::Other(format!("Cursor task failed: {e}")))?;
        }
        interrupt.abort();

        let checkpoint = tracker.close_and_save()?;
        info!(
            visited,
            saved = checkpoint.saved,
            finished = checkpoint.finished,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Walk stopped"
        );

        Ok(WalkSummary {
            restored,
            cursors: count,
            visited,
            saved: checkpoint.saved,
            finished: checkpoint.finished,
            complete: checkpoint.is_complete(),
        })
    }

    /// Output a message
    fn output_message(&self, msg: &Value) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        println!("{text}");
        Ok(())
    }
}

/// Advance `cursor` until it is exhausted, `stop` is raised, or `budget` runs out
fn drive<C: Cursor>(cursor: &mut C, stop: &AtomicBool, budget: Option<&AtomicUsize>) -> usize {
    let mut visited = 0;
    while !stop.load(Ordering::SeqCst) {
        if let Some(budget) = budget {
            let spent = budget
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_err();
            if spent {
                stop.store(true, Ordering::SeqCst);
                break;
            }
        }
        if !cursor.advance(true) {
            break;
        }
        visited += 1;
    }
    visited
}

/// Build a trie from a file of hex-encoded leaf keys, one per line
fn load_trie(path: &Path) -> Result<MemoryTrie> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file {}", path.display()))?;

    let keys = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| hex::decode(line).map_err(|e| Error::invalid_hex(line, e.to_string())))
        .collect::<Result<Vec<_>>>()?;

    MemoryTrie::from_keys(&keys)
}

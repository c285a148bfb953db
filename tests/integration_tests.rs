//! Integration tests for partitioned, resumable walks
//!
//! Tests the full flow: key set → partitioned cursors → interrupted runs →
//! recovery file → restored cursors → complete coverage

use clap::Parser;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::thread;
use trie_tracker::cli::{Cli, Runner};
use trie_tracker::tracker::read_recovery_file;
use trie_tracker::{load_config, subtrie_cursors, Cursor, MemoryTrie, Tracker, TrackerConfig};

/// Deterministic, distinct 4-byte leaf keys
fn keys(n: u32) -> Vec<[u8; 4]> {
    (0..n)
        .map(|i| i.wrapping_mul(0x9E37_79B9).to_be_bytes())
        .collect()
}

fn write_key_file(path: &Path, n: u32) {
    let lines: Vec<String> = keys(n).iter().map(hex::encode).collect();
    fs::write(path, lines.join("\n")).unwrap();
}

// ============================================================================
// Tracker Integration Tests
// ============================================================================

#[test]
fn test_interrupted_walk_resumes_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("recovery.csv");
    let trie = MemoryTrie::from_keys(&keys(2048)).unwrap();

    let mut seen = BTreeSet::new();
    let mut runs = 0;
    loop {
        runs += 1;
        assert!(runs < 100, "walk never completed");

        let tracker = Tracker::new(&file, 64);
        let mut cursors = tracker.restore(|key| trie.cursor(key)).unwrap();
        if runs == 1 {
            assert!(cursors.is_empty());
            for bin in subtrie_cursors(|key| trie.cursor(key), &[], 16).unwrap() {
                cursors.push(tracker.tracked(bin).unwrap());
            }
        } else {
            assert!(!cursors.is_empty());
        }

        // each worker takes a few steps, then the process "stops"
        let visited: Vec<Vec<Vec<u8>>> = thread::scope(|s| {
            let handles: Vec<_> = cursors
                .into_iter()
                .map(|mut cursor| {
                    s.spawn(move || {
                        let mut paths = Vec::new();
                        for _ in 0..50 {
                            if !cursor.advance(true) {
                                break;
                            }
                            paths.push(cursor.path().to_vec());
                        }
                        paths
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        seen.extend(visited.into_iter().flatten());

        let checkpoint = tracker.close_and_save().unwrap();
        if checkpoint.is_complete() {
            assert!(!file.exists());
            break;
        }
        assert_eq!(read_recovery_file(&file).unwrap().len(), checkpoint.saved);
    }

    let expected: BTreeSet<Vec<u8>> = trie.node_paths().iter().cloned().collect();
    assert!(runs > 1);
    assert_eq!(seen, expected);
}

#[test]
fn test_restore_twice_without_progress_keeps_positions() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("recovery.csv");
    let trie = MemoryTrie::from_keys(&keys(256)).unwrap();

    let tracker = Tracker::new(&file, 16);
    for mut bin in subtrie_cursors(|key| trie.cursor(key), &[], 4).unwrap() {
        bin.advance(true);
        bin.advance(true);
        tracker.tracked(bin).unwrap();
    }
    tracker.close_and_save().unwrap();
    let first = fs::read_to_string(&file).unwrap();

    // restoring and saving again without advancing writes the same rows
    let tracker = Tracker::new(&file, 16);
    let cursors = tracker.restore(|key| trie.cursor(key)).unwrap();
    assert_eq!(cursors.len(), 4);
    assert!(!file.exists());
    tracker.close_and_save().unwrap();

    let second = fs::read_to_string(&file).unwrap();
    assert_eq!(read_recovery_file(&file).unwrap().len(), 4);
    for (before, after) in first.lines().zip(second.lines()) {
        // odd positions come back rewound, even ones unchanged
        let before_start = before.split(',').next().unwrap();
        let after_start = after.split(',').next().unwrap();
        if before_start.len() % 4 == 0 {
            assert_eq!(before, after);
        } else {
            assert!(after_start < before_start);
        }
    }
}

// ============================================================================
// Config Integration Tests
// ============================================================================

#[test]
fn test_tracker_from_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let recovery = dir.path().join("state").join("walk.csv");
    fs::create_dir_all(recovery.parent().unwrap()).unwrap();

    let config_path = dir.path().join("walk.yaml");
    fs::write(
        &config_path,
        format!(
            "prefix: \"\"\nbins: 8\ntracker:\n  recovery_file: {}\n  capacity: 32\n",
            recovery.display()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    assert_eq!(
        config.tracker,
        TrackerConfig {
            recovery_file: recovery.clone(),
            capacity: 32,
        }
    );

    let tracker = Tracker::from_config(&config.tracker);
    assert_eq!(tracker.recovery_file(), recovery.as_path());
    assert_eq!(tracker.capacity(), 32);

    let trie = MemoryTrie::from_keys(&keys(64)).unwrap();
    let prefix = config.prefix_path().unwrap();
    for bin in subtrie_cursors(|key| trie.cursor(key), &prefix, config.bins).unwrap() {
        tracker.tracked(bin).unwrap();
    }
    let checkpoint = tracker.close_and_save().unwrap();
    assert_eq!(checkpoint.saved, 8);
    assert_eq!(read_recovery_file(&recovery).unwrap().len(), 8);
}

#[test]
fn test_cli_flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("walk.yaml");
    fs::write(&config_path, "prefix: \"3a\"\nbins: 4\n").unwrap();
    let recovery = dir.path().join("override.csv");

    let cli = Cli::parse_from([
        "trie-tracker",
        "-C",
        config_path.to_str().unwrap(),
        "-r",
        recovery.to_str().unwrap(),
        "inspect",
    ]);
    let runner = Runner::new(cli);

    let config = runner.load_config(None, Some(16)).unwrap();
    assert_eq!(config.prefix, "3a");
    assert_eq!(config.bins, 16);
    assert_eq!(config.tracker.recovery_file, recovery);

    assert!(runner.load_config(None, Some(3)).is_err());
}

// ============================================================================
// CLI Walk Integration Tests
// ============================================================================

#[tokio::test]
async fn test_cli_walk_resumes_after_budget() {
    let dir = tempfile::tempdir().unwrap();
    let keys_path = dir.path().join("keys.txt");
    write_key_file(&keys_path, 1024);
    let recovery = dir.path().join("walk.csv");
    let nodes = MemoryTrie::from_keys(&keys(1024)).unwrap().len();

    let cli = Cli::parse_from([
        "trie-tracker",
        "-r",
        recovery.to_str().unwrap(),
        "walk",
        "--keys",
        keys_path.to_str().unwrap(),
    ]);
    let runner = Runner::new(cli);

    let first = runner
        .walk(&keys_path, None, Some(4), Some(100))
        .await
        .unwrap();
    assert!(!first.restored);
    assert_eq!(first.cursors, 4);
    assert_eq!(first.visited, 100);
    assert_eq!(first.saved, 4);
    assert!(!first.complete);
    assert_eq!(read_recovery_file(&recovery).unwrap().len(), 4);

    let second = runner.walk(&keys_path, None, None, None).await.unwrap();
    assert!(second.restored);
    assert_eq!(second.cursors, 4);
    assert_eq!(second.finished, 4);
    assert!(second.complete);
    assert!(second.visited + first.visited >= nodes);
    assert!(!recovery.exists());
}

#[tokio::test]
async fn test_cli_walk_without_budget_completes() {
    let dir = tempfile::tempdir().unwrap();
    let keys_path = dir.path().join("keys.txt");
    write_key_file(&keys_path, 300);
    let recovery = dir.path().join("walk.csv");
    let nodes = MemoryTrie::from_keys(&keys(300)).unwrap().len();

    let cli = Cli::parse_from([
        "trie-tracker",
        "-r",
        recovery.to_str().unwrap(),
        "walk",
        "--keys",
        keys_path.to_str().unwrap(),
    ]);
    let runner = Runner::new(cli);

    let summary = runner.walk(&keys_path, None, None, None).await.unwrap();
    assert!(!summary.restored);
    assert_eq!(summary.cursors, 1);
    assert_eq!(summary.visited, nodes);
    assert!(summary.complete);
    assert!(!recovery.exists());
}

#[tokio::test]
async fn test_cli_paths_and_inspect_commands() {
    let dir = tempfile::tempdir().unwrap();
    let recovery = dir.path().join("walk.csv");
    fs::write(&recovery, "0400,0800\n08,\n").unwrap();

    let paths = Cli::parse_from(["trie-tracker", "paths", "--prefix", "3a", "--bins", "16"]);
    Runner::new(paths).run().await.unwrap();

    let odd = Cli::parse_from(["trie-tracker", "paths", "--bins", "6"]);
    assert!(Runner::new(odd).run().await.is_err());

    let inspect = Cli::parse_from([
        "trie-tracker",
        "--format",
        "pretty",
        "-r",
        recovery.to_str().unwrap(),
        "inspect",
    ]);
    Runner::new(inspect).run().await.unwrap();

    fs::write(&recovery, "0400\n").unwrap();
    let inspect = Cli::parse_from(["trie-tracker", "-r", recovery.to_str().unwrap(), "inspect"]);
    assert!(Runner::new(inspect).run().await.is_err());
}

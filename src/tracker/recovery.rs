//! Recovery file persistence

use super::types::RecoveryRecord;
use crate::error::{Result, ResultExt};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Read every record from a recovery file
///
/// A missing file reads as no records. Any malformed row fails the whole read.
pub fn read_recovery_file(path: impl AsRef<Path>) -> Result<Vec<RecoveryRecord>> {
    Ok(load_records(path.as_ref())?.unwrap_or_default())
}

/// Load records, returning `None` when the file does not exist
pub(crate) fn load_records(path: &Path) -> Result<Option<Vec<RecoveryRecord>>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    contents
        .lines()
        .enumerate()
        .filter(|(_, row)| !row.trim_end_matches('\r').is_empty())
        .map(|(i, row)| RecoveryRecord::parse_row(i + 1, row.trim_end_matches('\r')))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Replace the recovery file with `records`
///
/// Rows are written to a sibling temp file which is then renamed over the
/// target, so readers never see a partial file.
pub(crate) fn write_records(path: &Path, records: &[RecoveryRecord]) -> Result<()> {
    let mut contents = String::new();
    for record in records {
        contents.push_str(&record.to_row());
        contents.push('\n');
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)
        .with_context(|| format!("Failed to create {}", temp_path.display()))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.sync_all())
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    drop(file);

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))
}

/// Delete the recovery file, treating a missing file as success
pub(crate) fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => {
            Err(e).with_context(|| format!("Failed to remove {}", path.display()))
        }
        _ => Ok(()),
    }
}

use std::path::Path;

use marginalia_core::backup::Backup;
use marginalia_core::models::Snapshot;
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct BackupStats {
    pub locations: usize,
    pub bookmarks: usize,
    pub tags: usize,
    pub tag_maps: usize,
    pub user_marks: usize,
    pub block_ranges: usize,
    pub notes: usize,
}

pub fn run_stats(backup: &Path, as_json: bool) -> Result<(), CliError> {
    let backup = Backup::open(backup)?;

    if as_json {
        let stats = snapshot_stats(&backup.snapshot);
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    for line in format_stats_lines(&backup.snapshot) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn snapshot_stats(snapshot: &Snapshot) -> BackupStats {
    let [locations, bookmarks, tags, tag_maps, user_marks, block_ranges, notes] =
        snapshot.row_counts().map(|(_, count)| count);
    BackupStats {
        locations,
        bookmarks,
        tags,
        tag_maps,
        user_marks,
        block_ranges,
        notes,
    }
}

pub(crate) fn format_stats_lines(snapshot: &Snapshot) -> Vec<String> {
    let counts = snapshot.row_counts();
    let width = counts
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    counts
        .iter()
        .map(|(name, count)| format!("{name:width$}  {count}"))
        .collect()
}

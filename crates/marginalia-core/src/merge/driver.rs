//! Fixed-order merge pipeline over a whole snapshot.

use tracing::{debug, info};

use super::{
    merge_bookmarks, merge_locations, merge_notes, merge_tag_maps, merge_tags,
    merge_user_marks_and_block_ranges, update_ids, ConflictResolver, MergeError, Solutions,
};
use crate::error::{Error, Result};
use crate::models::Snapshot;

/// Merge two snapshots into one.
///
/// Tables are merged in dependency order; after each merge the emitted ID
/// changes are applied to every table on both pending sides that still
/// references the old numbering. When a table reports conflicts the
/// resolver is asked for solutions and the table merge re-runs; a
/// resolver that supplies nothing new surfaces the conflict error to the
/// caller. Fatal errors abort immediately and no result is produced.
pub fn merge_snapshots(
    left: &Snapshot,
    right: &Snapshot,
    resolver: &mut dyn ConflictResolver,
) -> Result<Snapshot> {
    let mut left = left.clone();
    let mut right = right.clone();
    let mut merged = Snapshot::default();

    info!("merging locations");
    let (locations, changes) = merge_locations(&left.locations, &right.locations)?;
    merged.locations = locations;
    debug!(
        moved_left = changes.left.len(),
        moved_right = changes.right.len(),
        "rewriting location references"
    );
    update_ids(&mut left.bookmarks, &mut right.bookmarks, "location_id", &changes)?;
    update_ids(
        &mut left.bookmarks,
        &mut right.bookmarks,
        "publication_location_id",
        &changes,
    )?;
    update_ids(&mut left.user_marks, &mut right.user_marks, "location_id", &changes)?;
    update_ids(&mut left.notes, &mut right.notes, "location_id", &changes)?;
    update_ids(&mut left.tag_maps, &mut right.tag_maps, "location_id", &changes)?;

    info!("merging bookmarks");
    let (bookmarks, _) = run_with_resolutions("Bookmark", &merged, resolver, |solutions| {
        merge_bookmarks(&left.bookmarks, &right.bookmarks, solutions)
    })?;
    merged.bookmarks = bookmarks;

    info!("merging tags");
    let (tags, changes) = run_with_resolutions("Tag", &merged, resolver, |solutions| {
        merge_tags(&left.tags, &right.tags, solutions)
    })?;
    merged.tags = tags;
    update_ids(&mut left.tag_maps, &mut right.tag_maps, "tag_id", &changes)?;

    info!("merging user marks and block ranges");
    let (user_marks, block_ranges, changes) =
        run_with_resolutions("UserMark", &merged, resolver, |solutions| {
            merge_user_marks_and_block_ranges(
                &left.user_marks,
                &left.block_ranges,
                &right.user_marks,
                &right.block_ranges,
                solutions,
            )
        })?;
    merged.user_marks = user_marks;
    merged.block_ranges = block_ranges;
    update_ids(&mut left.notes, &mut right.notes, "user_mark_id", &changes)?;

    info!("merging notes");
    let (notes, changes) = run_with_resolutions("Note", &merged, resolver, |solutions| {
        merge_notes(&left.notes, &right.notes, solutions)
    })?;
    merged.notes = notes;
    update_ids(&mut left.tag_maps, &mut right.tag_maps, "note_id", &changes)?;

    info!("merging tag maps");
    let (tag_maps, _) = run_with_resolutions("TagMap", &merged, resolver, |solutions| {
        merge_tag_maps(&left.tag_maps, &right.tag_maps, solutions)
    })?;
    merged.tag_maps = tag_maps;

    Ok(merged)
}

/// Re-run one table merge until its conflicts are resolved.
///
/// Solutions accumulate across rounds, so a partial answer narrows the
/// reported set on the next attempt instead of discarding progress.
fn run_with_resolutions<T>(
    table: &'static str,
    context: &Snapshot,
    resolver: &mut dyn ConflictResolver,
    mut merge_table: impl FnMut(&Solutions) -> std::result::Result<T, MergeError>,
) -> Result<T> {
    let mut solutions = Solutions::new();
    loop {
        match merge_table(&solutions) {
            Ok(result) => return Ok(result),
            Err(MergeError::Conflicts(conflicts)) => {
                info!(table, count = conflicts.len(), "resolving merge conflicts");
                let supplied = resolver.resolve(table, &conflicts, context)?;
                let known = solutions.len();
                solutions.extend(supplied);
                if solutions.len() == known {
                    // The resolver made no progress; report the conflicts
                    // instead of looping forever.
                    return Err(Error::Merge(MergeError::Conflicts(conflicts)));
                }
            }
            Err(error) => return Err(error.into()),
        }
    }
}

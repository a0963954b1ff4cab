//! Joint merge of the UserMark and BlockRange tables.
//!
//! A user mark and its block ranges form one compound, so the two tables
//! are merged together: compounds deduplicate by GUID like any other
//! entity, then surviving compounds that highlight overlapping text are
//! treated as conflicts even though their GUIDs differ. Block ranges are
//! renumbered globally afterwards, parent by parent.

use std::collections::HashMap;

use super::skeleton::{dedup_rows, renumber, Survivor};
use super::{Conflicts, IdChanges, MergeConflict, MergeError, Solutions};
use crate::models::{BlockRange, MarkedSection, Mergeable, UserMark};

/// Merge both sides' UserMark and BlockRange tables as compounds.
///
/// Returns the merged mark list, the merged range list (renumbered, each
/// range's `user_mark_id` pointing at its parent's new ID) and the
/// user-mark [`IdChanges`] the driver applies to notes.
pub fn merge_user_marks_and_block_ranges(
    left_marks: &[Option<UserMark>],
    left_ranges: &[Option<BlockRange>],
    right_marks: &[Option<UserMark>],
    right_ranges: &[Option<BlockRange>],
    solutions: &Solutions,
) -> Result<(Vec<Option<UserMark>>, Vec<Option<BlockRange>>, IdChanges), MergeError> {
    let left_sections = group_marked_sections(left_marks, left_ranges)?;
    let right_sections = group_marked_sections(right_marks, right_ranges)?;

    let (mut survivors, conflicts) = dedup_rows(&left_sections, &right_sections, solutions)?;
    if !conflicts.is_empty() {
        return Err(MergeError::Conflicts(conflicts));
    }

    resolve_overlaps(&mut survivors, solutions)?;

    let (sections, changes) = renumber(survivors);

    let mut marks = Vec::with_capacity(sections.len());
    marks.push(None);
    let mut ranges: Vec<Option<BlockRange>> = vec![None];
    let mut next_range_id = 1;

    for section in sections.into_iter().flatten() {
        let MarkedSection {
            user_mark,
            mut block_ranges,
        } = section;
        let parent_id = user_mark.user_mark_id;
        marks.push(Some(user_mark));

        block_ranges.sort_by_key(|r| (r.identifier, r.start_token, r.end_token, r.block_type));
        for mut range in block_ranges {
            range.user_mark_id = parent_id;
            range.block_range_id = next_range_id;
            next_range_id += 1;
            ranges.push(Some(range));
        }
    }

    Ok((marks, ranges, changes))
}

/// Attach each block range to its parent mark, preserving list shape.
/// A range pointing at a mark that does not exist is corrupt input.
fn group_marked_sections(
    marks: &[Option<UserMark>],
    ranges: &[Option<BlockRange>],
) -> Result<Vec<Option<MarkedSection>>, MergeError> {
    let mut children: HashMap<i32, Vec<BlockRange>> = HashMap::new();
    for range in ranges.iter().flatten() {
        children
            .entry(range.user_mark_id)
            .or_default()
            .push(range.clone());
    }

    let mut sections = Vec::with_capacity(marks.len());
    for slot in marks {
        sections.push(slot.as_ref().map(|mark| MarkedSection {
            user_mark: mark.clone(),
            block_ranges: children.remove(&mark.user_mark_id).unwrap_or_default(),
        }));
    }

    if let Some(orphan) = children.keys().next() {
        return Err(MergeError::Invariant(format!(
            "block range references missing user mark {orphan}"
        )));
    }
    Ok(sections)
}

/// Detect surviving compounds that highlight the same text and fold each
/// resolved pair into its winner. Pairs without a resolution are
/// reported as conflicts keyed by the sorted GUID pair.
fn resolve_overlaps(
    survivors: &mut Vec<Survivor<MarkedSection>>,
    solutions: &Solutions,
) -> Result<(), MergeError> {
    let mut conflicts = Conflicts::new();

    'rescan: loop {
        for i in 0..survivors.len() {
            for j in (i + 1)..survivors.len() {
                if !survivors[i].row.overlaps(&survivors[j].row) {
                    continue;
                }
                let key = overlap_key(&survivors[i].row, &survivors[j].row);

                if let Some(solution) = solutions.get(&key) {
                    let chosen =
                        MarkedSection::from_entity(solution.solution.clone()).ok_or_else(|| {
                            MergeError::Invariant(format!(
                                "resolution for key {key} carries a different entity kind"
                            ))
                        })?;
                    let winner = if chosen.unique_key() == survivors[i].row.unique_key() {
                        i
                    } else if chosen.unique_key() == survivors[j].row.unique_key() {
                        j
                    } else {
                        return Err(MergeError::Invariant(format!(
                            "resolution for key {key} matches neither overlapping mark"
                        )));
                    };
                    let loser_index = if winner == i { j } else { i };
                    let loser = survivors.remove(loser_index);
                    let winner = &mut survivors[if loser_index < winner {
                        winner - 1
                    } else {
                        winner
                    }];
                    winner.absorbed.push((loser.side, loser.original_id));
                    winner.absorbed.extend(loser.absorbed);
                    continue 'rescan;
                }

                // Deterministic left/right assignment: origin side first,
                // then GUID order when both survivors share a side.
                let (first, second) = if (survivors[j].side, &survivors[j].row.user_mark.user_mark_guid)
                    < (survivors[i].side, &survivors[i].row.user_mark.user_mark_guid)
                {
                    (j, i)
                } else {
                    (i, j)
                };
                conflicts.insert(
                    key,
                    MergeConflict {
                        left: survivors[first].row.clone().into_entity(),
                        right: survivors[second].row.clone().into_entity(),
                    },
                );
            }
        }
        break;
    }

    if !conflicts.is_empty() {
        return Err(MergeError::Conflicts(conflicts));
    }
    Ok(())
}

/// Conflict key for an overlapping pair: both GUIDs in sorted order.
fn overlap_key(a: &MarkedSection, b: &MarkedSection) -> String {
    let (first, second) = if a.user_mark.user_mark_guid <= b.user_mark.user_mark_guid {
        (&a.user_mark.user_mark_guid, &b.user_mark.user_mark_guid)
    } else {
        (&b.user_mark.user_mark_guid, &a.user_mark.user_mark_guid)
    };
    format!("{first}_{second}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{MergeSolution, Side};

    fn mark(id: i32, guid: &str, location: i32) -> Option<UserMark> {
        Some(UserMark {
            user_mark_id: id,
            color_index: 1,
            location_id: location,
            style_index: 0,
            user_mark_guid: guid.to_string(),
            version: 1,
        })
    }

    fn range(id: i32, owner: i32, identifier: i32, start: i32, end: i32) -> Option<BlockRange> {
        Some(BlockRange {
            block_range_id: id,
            block_type: 1,
            identifier,
            start_token: Some(start),
            end_token: Some(end),
            user_mark_id: owner,
        })
    }

    #[test]
    fn identical_marks_collapse_with_their_ranges() {
        let left_marks = vec![None, mark(1, "g1", 1)];
        let left_ranges = vec![None, range(1, 1, 1, 0, 5)];
        let right_marks = vec![None, mark(1, "g1", 1)];
        let right_ranges = vec![None, range(1, 1, 1, 0, 5)];

        let (marks, ranges, changes) = merge_user_marks_and_block_ranges(
            &left_marks,
            &left_ranges,
            &right_marks,
            &right_ranges,
            &Solutions::new(),
        )
        .unwrap();

        assert_eq!(marks.iter().flatten().count(), 1);
        assert_eq!(ranges.iter().flatten().count(), 1);
        assert_eq!(ranges[1].as_ref().unwrap().user_mark_id, 1);
        assert_eq!(changes.right, HashMap::from([(1, 1)]));
    }

    #[test]
    fn marks_without_ranges_are_valid_compounds() {
        let left_marks = vec![None, mark(1, "g1", 1)];
        let right_marks: Vec<Option<UserMark>> = vec![None];

        let (marks, ranges, _) = merge_user_marks_and_block_ranges(
            &left_marks,
            &[None],
            &right_marks,
            &[None],
            &Solutions::new(),
        )
        .unwrap();

        assert_eq!(marks.iter().flatten().count(), 1);
        assert_eq!(ranges.iter().flatten().count(), 0);
    }

    #[test]
    fn orphaned_block_range_is_corrupt_input() {
        let marks = vec![None, mark(1, "g1", 1)];
        let ranges = vec![None, range(1, 9, 1, 0, 5)];

        assert!(matches!(
            merge_user_marks_and_block_ranges(&marks, &ranges, &[None], &[None], &Solutions::new()),
            Err(MergeError::Invariant(_))
        ));
    }

    #[test]
    fn same_guid_different_content_conflicts_on_the_guid() {
        let left_marks = vec![None, mark(1, "g1", 1)];
        let right_marks = vec![None, {
            let mut m = mark(1, "g1", 1);
            if let Some(inner) = m.as_mut() {
                inner.color_index = 4;
            }
            m
        }];

        let err = merge_user_marks_and_block_ranges(
            &left_marks,
            &[None],
            &right_marks,
            &[None],
            &Solutions::new(),
        )
        .unwrap_err();
        let MergeError::Conflicts(conflicts) = err else {
            panic!("expected conflicts, got {err:?}");
        };
        assert!(conflicts.contains_key("g1"));
    }

    #[test]
    fn overlapping_marks_with_distinct_guids_conflict_on_the_pair() {
        let left_marks = vec![None, mark(1, "g1", 1)];
        let left_ranges = vec![None, range(1, 1, 1, 3, 7)];
        let right_marks = vec![None, mark(1, "g2", 1)];
        let right_ranges = vec![None, range(1, 1, 1, 5, 9)];

        let err = merge_user_marks_and_block_ranges(
            &left_marks,
            &left_ranges,
            &right_marks,
            &right_ranges,
            &Solutions::new(),
        )
        .unwrap_err();
        let MergeError::Conflicts(conflicts) = err else {
            panic!("expected conflicts, got {err:?}");
        };
        assert_eq!(conflicts.len(), 1);
        let conflict = &conflicts["g1_g2"];
        assert_eq!(conflict.left.unique_key(), "g1");
        assert_eq!(conflict.right.unique_key(), "g2");
    }

    #[test]
    fn resolving_an_overlap_redirects_the_loser() {
        let left_marks = vec![None, mark(1, "g1", 1)];
        let left_ranges = vec![None, range(1, 1, 1, 3, 7)];
        let right_marks = vec![None, mark(1, "g2", 1)];
        let right_ranges = vec![None, range(1, 1, 1, 5, 9)];

        let conflicts = match merge_user_marks_and_block_ranges(
            &left_marks,
            &left_ranges,
            &right_marks,
            &right_ranges,
            &Solutions::new(),
        ) {
            Err(MergeError::Conflicts(conflicts)) => conflicts,
            other => panic!("expected conflicts, got {other:?}"),
        };
        let mut solutions = Solutions::new();
        solutions.insert(
            "g1_g2".to_string(),
            MergeSolution::keep(Side::Left, &conflicts["g1_g2"]),
        );

        let (marks, ranges, changes) = merge_user_marks_and_block_ranges(
            &left_marks,
            &left_ranges,
            &right_marks,
            &right_ranges,
            &solutions,
        )
        .unwrap();

        assert_eq!(marks.iter().flatten().count(), 1);
        assert_eq!(marks[1].as_ref().unwrap().user_mark_guid, "g1");
        assert_eq!(ranges.iter().flatten().count(), 1);
        // Any note referencing the discarded right mark follows it into
        // the winner's new ID.
        assert_eq!(changes.right, HashMap::from([(1, 1)]));
    }

    #[test]
    fn non_overlapping_marks_all_survive_with_renumbered_ranges() {
        let left_marks = vec![None, mark(1, "b-guid", 1)];
        let left_ranges = vec![None, range(1, 1, 1, 0, 4), range(2, 1, 2, 0, 4)];
        let right_marks = vec![None, mark(1, "a-guid", 2)];
        let right_ranges = vec![None, range(1, 1, 1, 0, 4)];

        let (marks, ranges, changes) = merge_user_marks_and_block_ranges(
            &left_marks,
            &left_ranges,
            &right_marks,
            &right_ranges,
            &Solutions::new(),
        )
        .unwrap();

        // Sorted by GUID: the right mark now precedes the left one.
        assert_eq!(marks[1].as_ref().unwrap().user_mark_guid, "a-guid");
        assert_eq!(marks[2].as_ref().unwrap().user_mark_guid, "b-guid");
        assert_eq!(changes.left, HashMap::from([(1, 2)]));
        // The right mark landed on its own original ID, so nothing moved.
        assert!(changes.right.is_empty());

        let flat: Vec<&BlockRange> = ranges.iter().flatten().collect();
        assert_eq!(flat.len(), 3);
        for (index, range) in flat.iter().enumerate() {
            assert_eq!(range.block_range_id, (index + 1) as i32);
        }
        assert_eq!(flat[0].user_mark_id, 1);
        assert_eq!(flat[1].user_mark_id, 2);
        assert_eq!(flat[2].user_mark_id, 2);
    }

    #[test]
    fn ranges_on_different_identifiers_do_not_conflict() {
        let left_marks = vec![None, mark(1, "g1", 1)];
        let left_ranges = vec![None, range(1, 1, 1, 3, 7)];
        let right_marks = vec![None, mark(1, "g2", 1)];
        let right_ranges = vec![None, range(1, 1, 2, 3, 7)];

        let (marks, _, _) = merge_user_marks_and_block_ranges(
            &left_marks,
            &left_ranges,
            &right_marks,
            &right_ranges,
            &Solutions::new(),
        )
        .unwrap();
        assert_eq!(marks.iter().flatten().count(), 2);
    }
}

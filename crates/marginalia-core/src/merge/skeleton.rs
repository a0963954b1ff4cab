//! Generic merge skeleton: deduplicate, resolve, sort, renumber.

use std::collections::BTreeMap;

use super::{Conflicts, IdChanges, MergeConflict, MergeError, Side, Solutions};
use crate::models::Mergeable;

/// A row that made it through deduplication, together with everything
/// needed to renumber it and redirect the rows it absorbed.
#[derive(Debug, Clone)]
pub(crate) struct Survivor<T> {
    pub row: T,
    pub side: Side,
    pub original_id: i32,
    /// Original (side, ID) pairs of rows collapsed or discarded into this
    /// one; they are redirected to the survivor's new ID.
    pub absorbed: Vec<(Side, i32)>,
}

/// Merge two 1-indexed row lists into one.
///
/// Rows sharing a unique key collapse into a single survivor when they
/// are structurally equal (the Left copy wins ties). Unequal rows under
/// one key require a resolution from `solutions`; without one the whole
/// merge fails with [`MergeError::Conflicts`] and no partial result.
/// Survivors are sorted by unique key and renumbered from 1, index 0
/// holding the sentinel; the returned [`IdChanges`] map every moved or
/// absorbed original ID to its new one.
pub fn merge_rows<T: Mergeable>(
    left: &[Option<T>],
    right: &[Option<T>],
    solutions: &Solutions,
) -> Result<(Vec<Option<T>>, IdChanges), MergeError> {
    let (survivors, conflicts) = dedup_rows(left, right, solutions)?;
    if !conflicts.is_empty() {
        return Err(MergeError::Conflicts(conflicts));
    }
    Ok(renumber(survivors))
}

/// Group both sides by unique key and collapse each group to at most one
/// survivor. Groups whose members disagree and have no supplied solution
/// are reported as conflicts instead.
pub(crate) fn dedup_rows<T: Mergeable>(
    left: &[Option<T>],
    right: &[Option<T>],
    solutions: &Solutions,
) -> Result<(Vec<Survivor<T>>, Conflicts), MergeError> {
    struct Tagged<T> {
        side: Side,
        original_id: i32,
        row: T,
    }

    let mut groups: BTreeMap<String, Vec<Tagged<T>>> = BTreeMap::new();
    for (side, rows) in [(Side::Left, left), (Side::Right, right)] {
        for row in rows.iter().flatten() {
            groups.entry(row.unique_key()).or_default().push(Tagged {
                side,
                original_id: row.id(),
                row: row.clone(),
            });
        }
    }

    let mut survivors = Vec::with_capacity(groups.len());
    let mut conflicts = Conflicts::new();

    for (key, members) in groups {
        let all_equal = members
            .iter()
            .skip(1)
            .all(|member| members[0].row.matches(&member.row));

        if all_equal {
            let mut members = members.into_iter();
            let Some(first) = members.next() else {
                continue;
            };
            survivors.push(Survivor {
                row: first.row,
                side: first.side,
                original_id: first.original_id,
                absorbed: members.map(|m| (m.side, m.original_id)).collect(),
            });
        } else if let Some(solution) = solutions.get(&key) {
            let row = T::from_entity(solution.solution.clone()).ok_or_else(|| {
                MergeError::Invariant(format!(
                    "resolution for key {key} carries a different entity kind"
                ))
            })?;
            // The chosen row keeps its own identity for tie-breaking; every
            // group member is redirected to the survivor.
            let chosen = members
                .iter()
                .find(|m| m.side == solution.side && m.row.matches(&row))
                .or_else(|| members.first());
            let (side, original_id) = match chosen {
                Some(member) => (member.side, member.original_id),
                None => (solution.side, row.id()),
            };
            survivors.push(Survivor {
                row,
                side,
                original_id,
                absorbed: members
                    .iter()
                    .filter(|m| (m.side, m.original_id) != (side, original_id))
                    .map(|m| (m.side, m.original_id))
                    .collect(),
            });
        } else {
            let left_member = members.iter().find(|m| m.side == Side::Left);
            let right_member = members.iter().rfind(|m| m.side == Side::Right);
            let (Some(first), Some(second)) = (
                left_member.or(members.first()),
                right_member.or(members.last()),
            ) else {
                continue;
            };
            conflicts.insert(
                key,
                MergeConflict {
                    left: first.row.clone().into_entity(),
                    right: second.row.clone().into_entity(),
                },
            );
        }
    }

    Ok((survivors, conflicts))
}

/// Sort survivors by unique key (ties broken by side, then original ID,
/// for determinism only) and assign new IDs equal to their 1-based
/// position.
pub(crate) fn renumber<T: Mergeable>(mut survivors: Vec<Survivor<T>>) -> (Vec<Option<T>>, IdChanges) {
    survivors.sort_by_cached_key(|s| (s.row.unique_key(), s.side, s.original_id));

    let mut rows = Vec::with_capacity(survivors.len() + 1);
    rows.push(None);
    let mut changes = IdChanges::new();

    for (index, survivor) in survivors.into_iter().enumerate() {
        let new_id = (index + 1) as i32;
        if survivor.original_id != new_id {
            changes.side_mut(survivor.side).insert(survivor.original_id, new_id);
        }
        for (side, old_id) in survivor.absorbed {
            changes.side_mut(side).insert(old_id, new_id);
        }
        let mut row = survivor.row;
        row.set_id(new_id);
        rows.push(Some(row));
    }

    (rows, changes)
}

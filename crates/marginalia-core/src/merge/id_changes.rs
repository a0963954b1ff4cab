//! ID-change tracking and foreign-key rewriting.

use std::collections::HashMap;

use super::{MergeError, Side};
use crate::models::{FkSlot, Mergeable};

/// Old-ID to new-ID mappings emitted by one table merge, one map per
/// input side. Only IDs that actually moved (or were displaced into a
/// surviving row) appear here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdChanges {
    pub left: HashMap<i32, i32>,
    pub right: HashMap<i32, i32>,
}

impl IdChanges {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn side(&self, side: Side) -> &HashMap<i32, i32> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut HashMap<i32, i32> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// Rewrite the named FK field on both pending row lists according to the
/// per-side maps. IDs not present in a map are left untouched, as are
/// nullable references that are absent. Applying the same changes twice
/// only moves IDs that appear again as keys, so rewriting with an
/// identity map is a no-op.
pub fn update_ids<T: Mergeable>(
    left: &mut [Option<T>],
    right: &mut [Option<T>],
    field: &str,
    changes: &IdChanges,
) -> Result<(), MergeError> {
    apply_side(left, field, &changes.left)?;
    apply_side(right, field, &changes.right)
}

fn apply_side<T: Mergeable>(
    rows: &mut [Option<T>],
    field: &str,
    map: &HashMap<i32, i32>,
) -> Result<(), MergeError> {
    for row in rows.iter_mut().flatten() {
        match row.fk_slot(field)? {
            FkSlot::Required(slot) => {
                if let Some(&new_id) = map.get(slot) {
                    *slot = new_id;
                }
            }
            FkSlot::Nullable(slot) => {
                if let Some(value) = slot.as_mut() {
                    if let Some(&new_id) = map.get(value) {
                        *value = new_id;
                    }
                }
            }
        }
    }
    Ok(())
}

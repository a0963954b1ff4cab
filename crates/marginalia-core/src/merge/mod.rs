//! Merge engine for annotation snapshots.
//!
//! The engine reconciles two snapshots of the same annotation database
//! taken on different devices. Each table is merged by deduplicating rows
//! that share a unique key, renumbering survivors so IDs equal positions,
//! and emitting [`IdChanges`] that the driver applies to every table still
//! referencing the old numbering. Disagreements between the two sides are
//! surfaced as [`MergeConflict`]s; the caller supplies a
//! [`MergeSolution`] per conflict and re-invokes.

mod conflict;
mod driver;
mod id_changes;
mod marked_section;
mod skeleton;
mod tables;

pub use conflict::{ConflictResolver, MergeConflict, MergeSolution, PreferSide, Side};
pub use driver::merge_snapshots;
pub use id_changes::{update_ids, IdChanges};
pub use marked_section::merge_user_marks_and_block_ranges;
pub use skeleton::merge_rows;
pub use tables::{merge_bookmarks, merge_locations, merge_notes, merge_tag_maps, merge_tags};

use std::collections::BTreeMap;

use thiserror::Error;

/// Unresolved disagreements of one table merge, keyed by unique key.
pub type Conflicts = BTreeMap<String, MergeConflict>;

/// Resolutions supplied by the caller, keyed like [`Conflicts`]. Entries
/// whose key is not currently in conflict are ignored.
pub type Solutions = BTreeMap<String, MergeSolution>;

/// Errors raised by the merge engine.
#[derive(Debug, Error)]
pub enum MergeError {
    /// One or more disagreements without a supplied resolution. The caller
    /// resolves them and re-invokes; no partial result is returned.
    #[error("{} unresolved merge conflict(s)", .0.len())]
    Conflicts(Conflicts),

    /// A precondition on the input rows does not hold; aborts the merge.
    #[error("Invariant violation: {0}")]
    Invariant(String),

    /// An FK rewrite named a field the entity does not have.
    #[error("{entity} has no field named {field}")]
    UnknownField { entity: &'static str, field: String },

    /// An FK rewrite named a field that is not a rewritable reference.
    #[error("Field {field} of {entity} is not a rewritable reference")]
    UnsupportedField { entity: &'static str, field: String },
}

impl MergeError {
    pub(crate) fn unknown_field(entity: &'static str, field: &str) -> Self {
        Self::UnknownField {
            entity,
            field: field.to_string(),
        }
    }

    pub(crate) fn unsupported_field(entity: &'static str, field: &str) -> Self {
        Self::UnsupportedField {
            entity,
            field: field.to_string(),
        }
    }
}

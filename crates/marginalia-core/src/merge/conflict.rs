//! Conflict reporting and resolution protocol.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Conflicts, Solutions};
use crate::error::Result;
use crate::models::{Entity, Snapshot};

/// Which input snapshot a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// One disagreement: both sides claim the same entity with different
/// contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConflict {
    pub left: Entity,
    pub right: Entity,
}

/// The chosen resolution for one conflict. `side` records where the
/// surviving row came from and is kept for reporting; the engine acts on
/// `solution` and `discarded` directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSolution {
    pub side: Side,
    pub solution: Entity,
    pub discarded: Entity,
}

impl MergeSolution {
    /// Build the resolution that keeps the given side of a conflict.
    #[must_use]
    pub fn keep(side: Side, conflict: &MergeConflict) -> Self {
        match side {
            Side::Left => Self {
                side,
                solution: conflict.left.clone(),
                discarded: conflict.right.clone(),
            },
            Side::Right => Self {
                side,
                solution: conflict.right.clone(),
                discarded: conflict.left.clone(),
            },
        }
    }
}

/// Supplies resolutions while the driver loops over a failing table merge.
///
/// `context` is the partially merged snapshot: conflict rows carry
/// references that were already rewritten to merged numbering, so related
/// entries must be looked up there.
pub trait ConflictResolver {
    fn resolve(
        &mut self,
        table: &'static str,
        conflicts: &Conflicts,
        context: &Snapshot,
    ) -> Result<Solutions>;
}

/// Resolver that settles every conflict in favor of one side.
#[derive(Debug, Clone, Copy)]
pub struct PreferSide(pub Side);

impl ConflictResolver for PreferSide {
    fn resolve(
        &mut self,
        _table: &'static str,
        conflicts: &Conflicts,
        _context: &Snapshot,
    ) -> Result<Solutions> {
        Ok(conflicts
            .iter()
            .map(|(key, conflict)| (key.clone(), MergeSolution::keep(self.0, conflict)))
            .collect())
    }
}

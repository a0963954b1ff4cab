//! BlockRange model

use serde::{Deserialize, Serialize};

use super::{Entity, FkSlot, Mergeable};
use crate::merge::MergeError;
use crate::util::FieldTable;

/// One highlighted token span inside a text block, owned by a user mark.
/// Block ranges have no identity of their own; they belong to their
/// parent mark and are renumbered wholesale after every merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    pub block_range_id: i32,
    pub block_type: i32,
    pub identifier: i32,
    pub start_token: Option<i32>,
    pub end_token: Option<i32>,
    pub user_mark_id: i32,
}

impl BlockRange {
    /// Token span with absent bounds widened to cover the whole block.
    #[must_use]
    pub fn token_span(&self) -> (i32, i32) {
        (
            self.start_token.unwrap_or(0),
            self.end_token.unwrap_or(i32::MAX),
        )
    }

    /// Whether two ranges cover the same span, ignoring which mark owns
    /// them. Used for compound comparison, where the owning mark is
    /// being renumbered.
    #[must_use]
    pub fn same_span(&self, other: &Self) -> bool {
        self.block_type == other.block_type
            && self.identifier == other.identifier
            && self.start_token == other.start_token
            && self.end_token == other.end_token
    }

    /// Whether two ranges touch the same text: same block and identifier,
    /// inclusive token intervals overlapping.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        if self.block_type != other.block_type || self.identifier != other.identifier {
            return false;
        }
        let (start_a, end_a) = self.token_span();
        let (start_b, end_b) = other.token_span();
        start_a <= end_b && start_b <= end_a
    }

    #[must_use]
    pub fn pretty_print(&self) -> String {
        let mut table = FieldTable::new();
        table.field("identifier", self.identifier);
        table.field("block_type", self.block_type);
        table.opt_field("start_token", self.start_token.as_ref());
        table.opt_field("end_token", self.end_token.as_ref());
        table.render()
    }
}

impl Mergeable for BlockRange {
    const ENTITY_NAME: &'static str = "BlockRange";

    fn id(&self) -> i32 {
        self.block_range_id
    }

    fn set_id(&mut self, id: i32) {
        self.block_range_id = id;
    }

    fn unique_key(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            self.block_type,
            self.identifier,
            self.start_token.unwrap_or(0),
            self.end_token.unwrap_or(0),
            self.user_mark_id,
        )
    }

    fn matches(&self, other: &Self) -> bool {
        self.same_span(other) && self.user_mark_id == other.user_mark_id
    }

    fn fk_slot(&mut self, field: &str) -> Result<FkSlot<'_>, MergeError> {
        match field {
            "user_mark_id" => Ok(FkSlot::Required(&mut self.user_mark_id)),
            "block_range_id" | "block_type" | "identifier" | "start_token" | "end_token" => {
                Err(MergeError::unsupported_field(Self::ENTITY_NAME, field))
            }
            _ => Err(MergeError::unknown_field(Self::ENTITY_NAME, field)),
        }
    }

    fn into_entity(self) -> Entity {
        Entity::BlockRange(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::BlockRange(row) => Some(row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(identifier: i32, start: i32, end: i32) -> BlockRange {
        BlockRange {
            block_range_id: 0,
            block_type: 1,
            identifier,
            start_token: Some(start),
            end_token: Some(end),
            user_mark_id: 1,
        }
    }

    #[test]
    fn intersects_inclusive_bounds() {
        assert!(range(1, 3, 7).intersects(&range(1, 5, 9)));
        assert!(range(1, 3, 7).intersects(&range(1, 7, 9)));
        assert!(!range(1, 3, 7).intersects(&range(1, 8, 9)));
    }

    #[test]
    fn intersects_requires_same_identifier_and_block_type() {
        assert!(!range(1, 3, 7).intersects(&range(2, 3, 7)));

        let mut other_block = range(1, 3, 7);
        other_block.block_type = 2;
        assert!(!range(1, 3, 7).intersects(&other_block));
    }

    #[test]
    fn intersects_widens_absent_bounds() {
        let mut open_ended = range(1, 3, 7);
        open_ended.end_token = None;
        assert!(open_ended.intersects(&range(1, 100, 200)));
    }

    #[test]
    fn same_span_ignores_owner() {
        let a = range(1, 3, 7);
        let mut b = range(1, 3, 7);
        b.user_mark_id = 99;
        b.block_range_id = 12;
        assert!(a.same_span(&b));
        assert!(!a.matches(&b));
    }
}

//! MarkedSection compound model

use serde::{Deserialize, Serialize};

use super::{BlockRange, Entity, FkSlot, Mergeable, Snapshot, UserMark};
use crate::merge::MergeError;
use crate::util::indent;

/// A highlight as one inseparable unit: the user-mark head record plus
/// every block range it owns. The compound carries the mark's GUID as
/// its identity; the ranges have none of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedSection {
    pub user_mark: UserMark,
    pub block_ranges: Vec<BlockRange>,
}

impl MarkedSection {
    /// Multiset equality of the owned ranges, comparing spans only: range
    /// IDs and the owning mark ID are renumbered on every merge and carry
    /// no meaning.
    #[must_use]
    pub fn same_ranges(&self, other: &Self) -> bool {
        if self.block_ranges.len() != other.block_ranges.len() {
            return false;
        }
        let mut ours: Vec<&BlockRange> = self.block_ranges.iter().collect();
        let mut theirs: Vec<&BlockRange> = other.block_ranges.iter().collect();
        ours.sort_by_key(|r| (r.block_type, r.identifier, r.start_token, r.end_token));
        theirs.sort_by_key(|r| (r.block_type, r.identifier, r.start_token, r.end_token));
        ours.iter()
            .zip(theirs.iter())
            .all(|(a, b)| a.same_span(b))
    }

    /// Whether two sections highlight overlapping text: same location and
    /// at least one pair of intersecting ranges.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.user_mark.location_id != other.user_mark.location_id {
            return false;
        }
        self.block_ranges
            .iter()
            .any(|a| other.block_ranges.iter().any(|b| a.intersects(b)))
    }

    #[must_use]
    pub fn pretty_print(&self, snapshot: &Snapshot) -> String {
        let mut out = self.user_mark.pretty_print(snapshot);
        for range in &self.block_ranges {
            out.push_str("\nblock_range:\n");
            out.push_str(&indent(&range.pretty_print(), "  "));
        }
        out
    }
}

impl Mergeable for MarkedSection {
    const ENTITY_NAME: &'static str = "UserMark";

    fn id(&self) -> i32 {
        self.user_mark.user_mark_id
    }

    fn set_id(&mut self, id: i32) {
        self.user_mark.user_mark_id = id;
    }

    fn unique_key(&self) -> String {
        self.user_mark.user_mark_guid.clone()
    }

    fn matches(&self, other: &Self) -> bool {
        self.user_mark.matches(&other.user_mark) && self.same_ranges(other)
    }

    fn fk_slot(&mut self, field: &str) -> Result<FkSlot<'_>, MergeError> {
        self.user_mark.fk_slot(field)
    }

    fn into_entity(self) -> Entity {
        Entity::MarkedSection(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::MarkedSection(row) => Some(row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: i32, end: i32) -> BlockRange {
        BlockRange {
            block_range_id: 0,
            block_type: 1,
            identifier: 1,
            start_token: Some(start),
            end_token: Some(end),
            user_mark_id: 1,
        }
    }

    fn section(guid: &str, location_id: i32, ranges: Vec<BlockRange>) -> MarkedSection {
        MarkedSection {
            user_mark: UserMark {
                user_mark_id: 1,
                color_index: 2,
                location_id,
                style_index: 0,
                user_mark_guid: guid.to_string(),
                version: 1,
            },
            block_ranges: ranges,
        }
    }

    #[test]
    fn same_ranges_is_order_insensitive() {
        let a = section("g", 1, vec![range(1, 3), range(10, 12)]);
        let b = section("g", 1, vec![range(10, 12), range(1, 3)]);
        assert!(a.same_ranges(&b));
        assert!(a.matches(&b));
    }

    #[test]
    fn same_ranges_ignores_owner_and_range_ids() {
        let a = section("g", 1, vec![range(1, 3)]);
        let mut b = section("g", 1, vec![range(1, 3)]);
        b.block_ranges[0].block_range_id = 55;
        b.block_ranges[0].user_mark_id = 99;
        assert!(a.matches(&b));
    }

    #[test]
    fn differing_range_counts_do_not_match() {
        let a = section("g", 1, vec![range(1, 3)]);
        let b = section("g", 1, vec![range(1, 3), range(5, 6)]);
        assert!(!a.matches(&b));
    }

    #[test]
    fn overlap_requires_shared_location() {
        let a = section("g1", 1, vec![range(3, 7)]);
        let b = section("g2", 1, vec![range(5, 9)]);
        let c = section("g3", 2, vec![range(5, 9)]);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn empty_sections_never_overlap() {
        let a = section("g1", 1, vec![]);
        let b = section("g2", 1, vec![range(0, 100)]);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn clones_are_independent() {
        let a = section("g", 1, vec![range(1, 3)]);
        let mut b = a.clone();
        b.block_ranges[0].start_token = Some(50);
        assert_eq!(a.block_ranges[0].start_token, Some(1));
    }
}

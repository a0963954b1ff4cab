//! TagMap model

use serde::{Deserialize, Serialize};

use super::{Entity, FkSlot, Mergeable, Snapshot};
use crate::merge::MergeError;
use crate::util::{indent, FieldTable};

/// Assignment of a tag to a note, a location or a playlist item, with an
/// ordering position inside the tag. Exactly one of the three targets is
/// expected to be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMap {
    pub tag_map_id: i32,
    pub playlist_item_id: Option<i32>,
    pub location_id: Option<i32>,
    pub note_id: Option<i32>,
    pub tag_id: i32,
    pub position: i32,
}

impl TagMap {
    /// ID of whichever target this assignment points at, zero when none
    /// is set.
    #[must_use]
    pub fn target_id(&self) -> i32 {
        self.note_id
            .or(self.location_id)
            .or(self.playlist_item_id)
            .unwrap_or(0)
    }

    #[must_use]
    pub fn pretty_print(&self, snapshot: &Snapshot) -> String {
        let mut table = FieldTable::new();
        table.field("position", self.position);
        table.opt_field("playlist_item_id", self.playlist_item_id.as_ref());
        let mut out = table.render();

        if let Some(tag) = snapshot.tag(self.tag_id) {
            out.push_str("\ntag:\n");
            out.push_str(&indent(&tag.pretty_print(), "  "));
        }
        if let Some(note) = self.note_id.and_then(|id| snapshot.note(id)) {
            out.push_str("\nnote:\n");
            out.push_str(&indent(&note.pretty_print(snapshot), "  "));
        }
        if let Some(location) = self.location_id.and_then(|id| snapshot.location(id)) {
            out.push_str("\nlocation:\n");
            out.push_str(&indent(&location.pretty_print(), "  "));
        }
        out
    }
}

impl Mergeable for TagMap {
    const ENTITY_NAME: &'static str = "TagMap";

    fn id(&self) -> i32 {
        self.tag_map_id
    }

    fn set_id(&mut self, id: i32) {
        self.tag_map_id = id;
    }

    fn unique_key(&self) -> String {
        format!("{}_{}_{}", self.tag_id, self.target_id(), self.position)
    }

    fn matches(&self, other: &Self) -> bool {
        self.playlist_item_id == other.playlist_item_id
            && self.location_id == other.location_id
            && self.note_id == other.note_id
            && self.tag_id == other.tag_id
            && self.position == other.position
    }

    fn fk_slot(&mut self, field: &str) -> Result<FkSlot<'_>, MergeError> {
        match field {
            "tag_id" => Ok(FkSlot::Required(&mut self.tag_id)),
            "note_id" => Ok(FkSlot::Nullable(&mut self.note_id)),
            "location_id" => Ok(FkSlot::Nullable(&mut self.location_id)),
            "playlist_item_id" => Ok(FkSlot::Nullable(&mut self.playlist_item_id)),
            "tag_map_id" | "position" => {
                Err(MergeError::unsupported_field(Self::ENTITY_NAME, field))
            }
            _ => Err(MergeError::unknown_field(Self::ENTITY_NAME, field)),
        }
    }

    fn into_entity(self) -> Entity {
        Entity::TagMap(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::TagMap(row) => Some(row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_key_prefers_note_over_location() {
        let tag_map = TagMap {
            tag_map_id: 1,
            playlist_item_id: None,
            location_id: Some(4),
            note_id: Some(9),
            tag_id: 2,
            position: 0,
        };
        assert_eq!(tag_map.unique_key(), "2_9_0");
    }

    #[test]
    fn unique_key_falls_back_through_targets() {
        let by_location = TagMap {
            tag_id: 2,
            location_id: Some(4),
            position: 1,
            ..TagMap::default()
        };
        assert_eq!(by_location.unique_key(), "2_4_1");

        let unset = TagMap {
            tag_id: 2,
            position: 3,
            ..TagMap::default()
        };
        assert_eq!(unset.unique_key(), "2_0_3");
    }

    #[test]
    fn fk_slot_covers_all_three_targets() {
        let mut tag_map = TagMap::default();
        assert!(matches!(tag_map.fk_slot("tag_id"), Ok(FkSlot::Required(_))));
        assert!(matches!(tag_map.fk_slot("note_id"), Ok(FkSlot::Nullable(_))));
        assert!(matches!(
            tag_map.fk_slot("location_id"),
            Ok(FkSlot::Nullable(_))
        ));
        assert!(matches!(
            tag_map.fk_slot("playlist_item_id"),
            Ok(FkSlot::Nullable(_))
        ));
        assert!(matches!(
            tag_map.fk_slot("position"),
            Err(MergeError::UnsupportedField { .. })
        ));
    }
}

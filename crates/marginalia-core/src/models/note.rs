//! Note model

use serde::{Deserialize, Serialize};

use super::{Entity, FkSlot, Mergeable, Snapshot};
use crate::merge::MergeError;
use crate::util::{indent, FieldTable};

/// A free-text note, optionally anchored to a location and attached to a
/// highlight. Identified across devices by its GUID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub note_id: i32,
    pub guid: String,
    pub user_mark_id: Option<i32>,
    pub location_id: Option<i32>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub last_modified: String,
    pub block_type: i32,
    pub block_identifier: Option<i32>,
}

impl Note {
    #[must_use]
    pub fn pretty_print(&self, snapshot: &Snapshot) -> String {
        let mut table = FieldTable::new();
        table.opt_field("title", self.title.as_ref());
        table.opt_field("content", self.content.as_ref());
        table.field("last_modified", &self.last_modified);
        let mut out = table.render();

        if let Some(location) = self.location_id.and_then(|id| snapshot.location(id)) {
            out.push_str("\nlocation:\n");
            out.push_str(&indent(&location.pretty_print(), "  "));
        }
        if let Some(mark) = self.user_mark_id.and_then(|id| snapshot.user_mark(id)) {
            out.push_str("\nuser_mark:\n");
            out.push_str(&indent(&mark.pretty_print(snapshot), "  "));
        }
        out
    }
}

impl Mergeable for Note {
    const ENTITY_NAME: &'static str = "Note";

    fn id(&self) -> i32 {
        self.note_id
    }

    fn set_id(&mut self, id: i32) {
        self.note_id = id;
    }

    fn unique_key(&self) -> String {
        self.guid.clone()
    }

    fn matches(&self, other: &Self) -> bool {
        self.guid == other.guid
            && self.user_mark_id == other.user_mark_id
            && self.location_id == other.location_id
            && self.title == other.title
            && self.content == other.content
            && self.last_modified == other.last_modified
            && self.block_type == other.block_type
            && self.block_identifier == other.block_identifier
    }

    fn fk_slot(&mut self, field: &str) -> Result<FkSlot<'_>, MergeError> {
        match field {
            "user_mark_id" => Ok(FkSlot::Nullable(&mut self.user_mark_id)),
            "location_id" => Ok(FkSlot::Nullable(&mut self.location_id)),
            "note_id" | "guid" | "title" | "content" | "last_modified" | "block_type"
            | "block_identifier" => Err(MergeError::unsupported_field(Self::ENTITY_NAME, field)),
            _ => Err(MergeError::unknown_field(Self::ENTITY_NAME, field)),
        }
    }

    fn into_entity(self) -> Entity {
        Entity::Note(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Note(row) => Some(row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Note {
        Note {
            note_id: 1,
            guid: "5d3a2f6e".to_string(),
            user_mark_id: Some(2),
            location_id: Some(3),
            title: Some("Thought".to_string()),
            content: Some("Worth remembering".to_string()),
            last_modified: "2025-11-02T09:15:00+00:00".to_string(),
            block_type: 1,
            block_identifier: Some(4),
        }
    }

    #[test]
    fn unique_key_is_the_guid() {
        assert_eq!(sample().unique_key(), "5d3a2f6e");
    }

    #[test]
    fn matches_includes_anchor_references() {
        let a = sample();
        let mut b = sample();
        b.note_id = 77;
        assert!(a.matches(&b));

        b.user_mark_id = Some(9);
        assert!(!a.matches(&b));
    }

    #[test]
    fn fk_slot_anchors_are_nullable() {
        let mut note = sample();
        assert!(matches!(note.fk_slot("user_mark_id"), Ok(FkSlot::Nullable(_))));
        assert!(matches!(note.fk_slot("location_id"), Ok(FkSlot::Nullable(_))));
        assert!(matches!(
            note.fk_slot("guid"),
            Err(MergeError::UnsupportedField { .. })
        ));
        assert!(matches!(
            note.fk_slot("wrong_field"),
            Err(MergeError::UnknownField { .. })
        ));
    }
}

//! Bookmark model

use serde::{Deserialize, Serialize};

use super::{Entity, FkSlot, Mergeable, Snapshot};
use crate::merge::MergeError;
use crate::util::{indent, FieldTable};

/// A saved reading position. Each publication offers a fixed set of
/// slots; the pair (publication location, slot) identifies a bookmark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub bookmark_id: i32,
    pub location_id: i32,
    pub publication_location_id: i32,
    pub slot: i32,
    pub title: String,
    pub snippet: Option<String>,
    pub block_type: i32,
    pub block_identifier: Option<i32>,
}

impl Bookmark {
    #[must_use]
    pub fn pretty_print(&self, snapshot: &Snapshot) -> String {
        let mut table = FieldTable::new();
        table.field("title", &self.title);
        table.opt_field("snippet", self.snippet.as_ref());
        table.field("slot", self.slot);
        let mut out = table.render();

        if let Some(location) = snapshot.location(self.location_id) {
            out.push_str("\nlocation:\n");
            out.push_str(&indent(&location.pretty_print(), "  "));
        }
        if let Some(publication) = snapshot.location(self.publication_location_id) {
            out.push_str("\npublication_location:\n");
            out.push_str(&indent(&publication.pretty_print(), "  "));
        }
        out
    }
}

impl Mergeable for Bookmark {
    const ENTITY_NAME: &'static str = "Bookmark";

    fn id(&self) -> i32 {
        self.bookmark_id
    }

    fn set_id(&mut self, id: i32) {
        self.bookmark_id = id;
    }

    fn unique_key(&self) -> String {
        format!("{}_{}", self.publication_location_id, self.slot)
    }

    fn matches(&self, other: &Self) -> bool {
        self.location_id == other.location_id
            && self.publication_location_id == other.publication_location_id
            && self.slot == other.slot
            && self.title == other.title
            && self.snippet == other.snippet
            && self.block_type == other.block_type
            && self.block_identifier == other.block_identifier
    }

    fn fk_slot(&mut self, field: &str) -> Result<FkSlot<'_>, MergeError> {
        match field {
            "location_id" => Ok(FkSlot::Required(&mut self.location_id)),
            "publication_location_id" => Ok(FkSlot::Required(&mut self.publication_location_id)),
            "bookmark_id" | "slot" | "title" | "snippet" | "block_type" | "block_identifier" => {
                Err(MergeError::unsupported_field(Self::ENTITY_NAME, field))
            }
            _ => Err(MergeError::unknown_field(Self::ENTITY_NAME, field)),
        }
    }

    fn into_entity(self) -> Entity {
        Entity::Bookmark(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Bookmark(row) => Some(row),
            _ => None,
        }
    }
}

//! UserMark model

use serde::{Deserialize, Serialize};

use super::{Entity, FkSlot, Mergeable, Snapshot};
use crate::merge::MergeError;
use crate::util::{indent, FieldTable};

/// The head record of a highlight: color and style applied at one
/// location. The highlighted text spans live in the block-range table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMark {
    pub user_mark_id: i32,
    pub color_index: i32,
    pub location_id: i32,
    pub style_index: i32,
    pub user_mark_guid: String,
    pub version: i32,
}

impl UserMark {
    #[must_use]
    pub fn pretty_print(&self, snapshot: &Snapshot) -> String {
        let mut table = FieldTable::new();
        table.field("color_index", self.color_index);
        table.field("style_index", self.style_index);
        table.field("version", self.version);
        let mut out = table.render();

        if let Some(location) = snapshot.location(self.location_id) {
            out.push_str("\nlocation:\n");
            out.push_str(&indent(&location.pretty_print(), "  "));
        }
        out
    }
}

impl Mergeable for UserMark {
    const ENTITY_NAME: &'static str = "UserMark";

    fn id(&self) -> i32 {
        self.user_mark_id
    }

    fn set_id(&mut self, id: i32) {
        self.user_mark_id = id;
    }

    fn unique_key(&self) -> String {
        self.user_mark_guid.clone()
    }

    fn matches(&self, other: &Self) -> bool {
        self.color_index == other.color_index
            && self.location_id == other.location_id
            && self.style_index == other.style_index
            && self.user_mark_guid == other.user_mark_guid
            && self.version == other.version
    }

    fn fk_slot(&mut self, field: &str) -> Result<FkSlot<'_>, MergeError> {
        match field {
            "location_id" => Ok(FkSlot::Required(&mut self.location_id)),
            "user_mark_id" | "color_index" | "style_index" | "user_mark_guid" | "version" => {
                Err(MergeError::unsupported_field(Self::ENTITY_NAME, field))
            }
            _ => Err(MergeError::unknown_field(Self::ENTITY_NAME, field)),
        }
    }

    fn into_entity(self) -> Entity {
        Entity::UserMark(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::UserMark(row) => Some(row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_id_overwrites_primary_key() {
        let mut mark = UserMark {
            user_mark_id: 1,
            ..UserMark::default()
        };
        mark.set_id(10);
        assert_eq!(mark.user_mark_id, 10);
    }

    #[test]
    fn matches_excludes_only_the_id() {
        let a = UserMark {
            user_mark_id: 1,
            color_index: 1,
            location_id: 1,
            style_index: 1,
            user_mark_guid: "FIRST".to_string(),
            version: 1,
        };
        let same_but_renumbered = UserMark {
            user_mark_id: 1000,
            ..a.clone()
        };
        let recolored = UserMark {
            color_index: 5,
            ..a.clone()
        };
        assert!(a.matches(&same_but_renumbered));
        assert!(!a.matches(&recolored));
    }

    #[test]
    fn unique_key_is_the_guid() {
        let mark = UserMark {
            user_mark_guid: "9c2f...".to_string(),
            ..UserMark::default()
        };
        assert_eq!(mark.unique_key(), "9c2f...");
    }
}

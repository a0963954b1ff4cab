//! Tag model

use serde::{Deserialize, Serialize};

use super::{Entity, FkSlot, Mergeable};
use crate::merge::MergeError;
use crate::util::FieldTable;

/// A named label. The type distinguishes reserved tags (favorites) from
/// user-created ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag_id: i32,
    pub tag_type: i32,
    pub name: String,
}

impl Tag {
    #[must_use]
    pub fn pretty_print(&self) -> String {
        let mut table = FieldTable::new();
        table.field("name", &self.name);
        table.field("tag_type", self.tag_type);
        table.render()
    }
}

impl Mergeable for Tag {
    const ENTITY_NAME: &'static str = "Tag";

    fn id(&self) -> i32 {
        self.tag_id
    }

    fn set_id(&mut self, id: i32) {
        self.tag_id = id;
    }

    fn unique_key(&self) -> String {
        format!("{}_{}", self.tag_type, self.name)
    }

    fn matches(&self, other: &Self) -> bool {
        self.tag_type == other.tag_type && self.name == other.name
    }

    fn fk_slot(&mut self, field: &str) -> Result<FkSlot<'_>, MergeError> {
        match field {
            "tag_id" | "tag_type" | "name" => {
                Err(MergeError::unsupported_field(Self::ENTITY_NAME, field))
            }
            _ => Err(MergeError::unknown_field(Self::ENTITY_NAME, field)),
        }
    }

    fn into_entity(self) -> Entity {
        Entity::Tag(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Tag(row) => Some(row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_key_combines_type_and_name() {
        let tag = Tag {
            tag_id: 1,
            tag_type: 1,
            name: "research".to_string(),
        };
        assert_eq!(tag.unique_key(), "1_research");
    }

    #[test]
    fn matches_excludes_tag_id() {
        let a = Tag {
            tag_id: 1,
            tag_type: 1,
            name: "study".to_string(),
        };
        let b = Tag { tag_id: 9, ..a.clone() };
        assert!(a.matches(&b));

        let c = Tag {
            name: "other".to_string(),
            ..a.clone()
        };
        assert!(!a.matches(&c));
    }
}

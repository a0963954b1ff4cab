//! Location model

use serde::{Deserialize, Serialize};

use super::{Entity, FkSlot, Mergeable};
use crate::merge::MergeError;
use crate::util::FieldTable;

/// A position inside a publication: a chapter of a book, a document, or
/// an audio/video track. Every other annotation anchors to one of these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: i32,
    pub book_number: Option<i32>,
    pub chapter_number: Option<i32>,
    pub document_id: Option<i32>,
    pub track: Option<i32>,
    pub issue_tag_number: i32,
    pub key_symbol: Option<String>,
    pub meps_language: i32,
    pub location_type: i32,
    /// Descriptive only; ignored when comparing locations.
    pub title: Option<String>,
}

impl Location {
    #[must_use]
    pub fn pretty_print(&self) -> String {
        let mut table = FieldTable::new();
        table.opt_field("title", self.title.as_ref());
        table.opt_field("key_symbol", self.key_symbol.as_ref());
        table.field("issue_tag_number", self.issue_tag_number);
        table.field("meps_language", self.meps_language);
        table.opt_field("book_number", self.book_number.as_ref());
        table.opt_field("chapter_number", self.chapter_number.as_ref());
        table.opt_field("document_id", self.document_id.as_ref());
        table.opt_field("track", self.track.as_ref());
        table.render()
    }
}

impl Mergeable for Location {
    const ENTITY_NAME: &'static str = "Location";

    fn id(&self) -> i32 {
        self.location_id
    }

    fn set_id(&mut self, id: i32) {
        self.location_id = id;
    }

    fn unique_key(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}_{}_{}",
            self.book_number.unwrap_or(0),
            self.chapter_number.unwrap_or(0),
            self.document_id.unwrap_or(0),
            self.track.unwrap_or(0),
            self.issue_tag_number,
            self.key_symbol.as_deref().unwrap_or(""),
            self.meps_language,
            self.location_type,
        )
    }

    /// The unique key already covers every identifying field, and the only
    /// remaining one (`title`) is descriptive. Same-key locations always
    /// collapse, so locations can never be in conflict.
    fn matches(&self, _other: &Self) -> bool {
        true
    }

    fn fk_slot(&mut self, field: &str) -> Result<FkSlot<'_>, MergeError> {
        match field {
            "location_id" | "book_number" | "chapter_number" | "document_id" | "track"
            | "issue_tag_number" | "key_symbol" | "meps_language" | "location_type" | "title" => {
                Err(MergeError::unsupported_field(Self::ENTITY_NAME, field))
            }
            _ => Err(MergeError::unknown_field(Self::ENTITY_NAME, field)),
        }
    }

    fn into_entity(self) -> Entity {
        Entity::Location(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Location(row) => Some(row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Location {
        Location {
            location_id: 7,
            book_number: Some(43),
            chapter_number: Some(3),
            document_id: None,
            track: None,
            issue_tag_number: 0,
            key_symbol: Some("nwt".to_string()),
            meps_language: 2,
            location_type: 0,
            title: Some("John 3".to_string()),
        }
    }

    #[test]
    fn unique_key_contains_all_identifying_fields() {
        assert_eq!(sample().unique_key(), "43_3_0_0_0_nwt_2_0");
    }

    #[test]
    fn unique_key_absent_nullables_contribute_zero() {
        let location = Location::default();
        assert_eq!(location.unique_key(), "0_0_0_0_0__0_0");
    }

    #[test]
    fn matches_ignores_title() {
        let a = sample();
        let mut b = sample();
        b.title = Some("different".to_string());
        b.location_id = 99;
        assert!(a.matches(&b));
    }

    #[test]
    fn fk_slot_reports_structured_errors() {
        let mut location = sample();
        assert!(matches!(
            location.fk_slot("title"),
            Err(MergeError::UnsupportedField { .. })
        ));
        assert!(matches!(
            location.fk_slot("nonexistent"),
            Err(MergeError::UnknownField { .. })
        ));
    }

    #[test]
    fn pretty_print_omits_absent_fields() {
        let rendered = sample().pretty_print();
        assert!(rendered.contains("title:"));
        assert!(rendered.contains("key_symbol:"));
        assert!(!rendered.contains("document_id:"));
    }
}

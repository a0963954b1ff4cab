//! Snapshot of one device's annotation database.

use serde::{Deserialize, Serialize};

use super::{BlockRange, Bookmark, Location, Note, Tag, TagMap, UserMark};

/// All seven row lists of one annotation database.
///
/// Lists are 1-indexed: every `Some` row sits at the index equal to its
/// ID and index 0 holds a single `None` sentinel. Empty tables may be
/// represented by an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub locations: Vec<Option<Location>>,
    pub bookmarks: Vec<Option<Bookmark>>,
    pub tags: Vec<Option<Tag>>,
    pub tag_maps: Vec<Option<TagMap>>,
    pub user_marks: Vec<Option<UserMark>>,
    pub block_ranges: Vec<Option<BlockRange>>,
    pub notes: Vec<Option<Note>>,
}

fn row_by_id<T>(rows: &[Option<T>], id: i32) -> Option<&T> {
    if id <= 0 {
        return None;
    }
    rows.get(id as usize).and_then(Option::as_ref)
}

impl Snapshot {
    #[must_use]
    pub fn location(&self, id: i32) -> Option<&Location> {
        row_by_id(&self.locations, id)
    }

    #[must_use]
    pub fn tag(&self, id: i32) -> Option<&Tag> {
        row_by_id(&self.tags, id)
    }

    #[must_use]
    pub fn user_mark(&self, id: i32) -> Option<&UserMark> {
        row_by_id(&self.user_marks, id)
    }

    #[must_use]
    pub fn note(&self, id: i32) -> Option<&Note> {
        row_by_id(&self.notes, id)
    }

    /// All block ranges owned by the given user mark.
    #[must_use]
    pub fn block_ranges_for(&self, user_mark_id: i32) -> Vec<&BlockRange> {
        self.block_ranges
            .iter()
            .flatten()
            .filter(|range| range.user_mark_id == user_mark_id)
            .collect()
    }

    /// Count of live rows per table, in table order.
    #[must_use]
    pub fn row_counts(&self) -> [(&'static str, usize); 7] {
        [
            ("Location", self.locations.iter().flatten().count()),
            ("Bookmark", self.bookmarks.iter().flatten().count()),
            ("Tag", self.tags.iter().flatten().count()),
            ("TagMap", self.tag_maps.iter().flatten().count()),
            ("UserMark", self.user_marks.iter().flatten().count()),
            ("BlockRange", self.block_ranges.iter().flatten().count()),
            ("Note", self.notes.iter().flatten().count()),
        ]
    }
}

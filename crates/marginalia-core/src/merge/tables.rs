//! Per-table merge operations over the generic skeleton.

use super::{merge_rows, IdChanges, MergeError, Solutions};
use crate::models::{Bookmark, Location, Note, Tag, TagMap};

/// Merge the Location tables. Locations share their whole identity with
/// their unique key, so duplicates always collapse and no resolution map
/// is needed. The returned changes feed every location reference in the
/// other tables.
pub fn merge_locations(
    left: &[Option<Location>],
    right: &[Option<Location>],
) -> Result<(Vec<Option<Location>>, IdChanges), MergeError> {
    merge_rows(left, right, &Solutions::new())
}

/// Merge the Bookmark tables, keyed by (publication location, slot).
pub fn merge_bookmarks(
    left: &[Option<Bookmark>],
    right: &[Option<Bookmark>],
    solutions: &Solutions,
) -> Result<(Vec<Option<Bookmark>>, IdChanges), MergeError> {
    merge_rows(left, right, solutions)
}

/// Merge the Tag tables, keyed by (type, name).
pub fn merge_tags(
    left: &[Option<Tag>],
    right: &[Option<Tag>],
    solutions: &Solutions,
) -> Result<(Vec<Option<Tag>>, IdChanges), MergeError> {
    merge_rows(left, right, solutions)
}

/// Merge the TagMap tables. Their unique keys embed tag, target and
/// position IDs, so both inputs must already carry the merged numbering
/// of Tags, Locations and Notes.
pub fn merge_tag_maps(
    left: &[Option<TagMap>],
    right: &[Option<TagMap>],
    solutions: &Solutions,
) -> Result<(Vec<Option<TagMap>>, IdChanges), MergeError> {
    merge_rows(left, right, solutions)
}

/// Merge the Note tables, keyed by GUID. Runs after user marks so note
/// equality compares merged mark numbering.
pub fn merge_notes(
    left: &[Option<Note>],
    right: &[Option<Note>],
    solutions: &Solutions,
) -> Result<(Vec<Option<Note>>, IdChanges), MergeError> {
    merge_rows(left, right, solutions)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn locations_with_same_key_collapse_silently() {
        let left = vec![
            None,
            Some(Location {
                location_id: 1,
                book_number: Some(1),
                chapter_number: Some(2),
                key_symbol: Some("nwt".to_string()),
                title: Some("from the phone".to_string()),
                ..Location::default()
            }),
        ];
        let right = vec![
            None,
            Some(Location {
                location_id: 1,
                book_number: Some(1),
                chapter_number: Some(2),
                key_symbol: Some("nwt".to_string()),
                title: Some("from the tablet".to_string()),
                ..Location::default()
            }),
        ];

        let (merged, changes) = merge_locations(&left, &right).unwrap();

        assert_eq!(merged.iter().flatten().count(), 1);
        assert_eq!(
            merged[1].as_ref().unwrap().title.as_deref(),
            Some("from the phone")
        );
        assert!(changes.left.is_empty());
        assert_eq!(changes.right, HashMap::from([(1, 1)]));
    }

    #[test]
    fn distinct_locations_are_both_kept() {
        let left = vec![
            None,
            Some(Location {
                location_id: 1,
                document_id: Some(100),
                ..Location::default()
            }),
        ];
        let right = vec![
            None,
            Some(Location {
                location_id: 1,
                document_id: Some(200),
                ..Location::default()
            }),
        ];

        let (merged, _) = merge_locations(&left, &right).unwrap();
        assert_eq!(merged.iter().flatten().count(), 2);
    }
}

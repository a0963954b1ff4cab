//! Snapshot load/store against an annotation database.

use rusqlite::{params, Connection, Row};

use crate::error::{Error, Result};
use crate::models::{
    BlockRange, Bookmark, Location, Mergeable, Note, Snapshot, Tag, TagMap, UserMark,
};

/// Reads a whole [`Snapshot`] out of a database and writes one back.
pub struct SnapshotRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SnapshotRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Load all seven tables into the 1-indexed snapshot shape: every row
    /// sits at the index equal to its ID, index 0 holds the sentinel.
    pub fn load(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            locations: self.load_table(
                "SELECT LocationId, BookNumber, ChapterNumber, DocumentId, Track,
                        IssueTagNumber, KeySymbol, MepsLanguage, Type, Title
                 FROM Location",
                parse_location,
            )?,
            bookmarks: self.load_table(
                "SELECT BookmarkId, LocationId, PublicationLocationId, Slot, Title,
                        Snippet, BlockType, BlockIdentifier
                 FROM Bookmark",
                parse_bookmark,
            )?,
            tags: self.load_table("SELECT TagId, Type, Name FROM Tag", parse_tag)?,
            tag_maps: self.load_table(
                "SELECT TagMapId, PlaylistItemId, LocationId, NoteId, TagId, Position
                 FROM TagMap",
                parse_tag_map,
            )?,
            user_marks: self.load_table(
                "SELECT UserMarkId, ColorIndex, LocationId, StyleIndex, UserMarkGuid, Version
                 FROM UserMark",
                parse_user_mark,
            )?,
            block_ranges: self.load_table(
                "SELECT BlockRangeId, BlockType, Identifier, StartToken, EndToken, UserMarkId
                 FROM BlockRange",
                parse_block_range,
            )?,
            notes: self.load_table(
                "SELECT NoteId, Guid, UserMarkId, LocationId, Title, Content,
                        LastModified, BlockType, BlockIdentifier
                 FROM Note",
                parse_note,
            )?,
        })
    }

    /// Write every live row of the snapshot inside one transaction, in an
    /// order that satisfies the schema's foreign keys.
    pub fn store(&self, snapshot: &Snapshot) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        for location in snapshot.locations.iter().flatten() {
            tx.execute(
                "INSERT INTO Location (LocationId, BookNumber, ChapterNumber, DocumentId,
                    Track, IssueTagNumber, KeySymbol, MepsLanguage, Type, Title)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    location.location_id,
                    location.book_number,
                    location.chapter_number,
                    location.document_id,
                    location.track,
                    location.issue_tag_number,
                    location.key_symbol,
                    location.meps_language,
                    location.location_type,
                    location.title,
                ],
            )?;
        }
        for tag in snapshot.tags.iter().flatten() {
            tx.execute(
                "INSERT INTO Tag (TagId, Type, Name) VALUES (?, ?, ?)",
                params![tag.tag_id, tag.tag_type, tag.name],
            )?;
        }
        for mark in snapshot.user_marks.iter().flatten() {
            tx.execute(
                "INSERT INTO UserMark (UserMarkId, ColorIndex, LocationId, StyleIndex,
                    UserMarkGuid, Version)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    mark.user_mark_id,
                    mark.color_index,
                    mark.location_id,
                    mark.style_index,
                    mark.user_mark_guid,
                    mark.version,
                ],
            )?;
        }
        for range in snapshot.block_ranges.iter().flatten() {
            tx.execute(
                "INSERT INTO BlockRange (BlockRangeId, BlockType, Identifier, StartToken,
                    EndToken, UserMarkId)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    range.block_range_id,
                    range.block_type,
                    range.identifier,
                    range.start_token,
                    range.end_token,
                    range.user_mark_id,
                ],
            )?;
        }
        for note in snapshot.notes.iter().flatten() {
            tx.execute(
                "INSERT INTO Note (NoteId, Guid, UserMarkId, LocationId, Title, Content,
                    LastModified, BlockType, BlockIdentifier)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    note.note_id,
                    note.guid,
                    note.user_mark_id,
                    note.location_id,
                    note.title,
                    note.content,
                    note.last_modified,
                    note.block_type,
                    note.block_identifier,
                ],
            )?;
        }
        for bookmark in snapshot.bookmarks.iter().flatten() {
            tx.execute(
                "INSERT INTO Bookmark (BookmarkId, LocationId, PublicationLocationId, Slot,
                    Title, Snippet, BlockType, BlockIdentifier)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    bookmark.bookmark_id,
                    bookmark.location_id,
                    bookmark.publication_location_id,
                    bookmark.slot,
                    bookmark.title,
                    bookmark.snippet,
                    bookmark.block_type,
                    bookmark.block_identifier,
                ],
            )?;
        }
        for tag_map in snapshot.tag_maps.iter().flatten() {
            tx.execute(
                "INSERT INTO TagMap (TagMapId, PlaylistItemId, LocationId, NoteId, TagId,
                    Position)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    tag_map.tag_map_id,
                    tag_map.playlist_item_id,
                    tag_map.location_id,
                    tag_map.note_id,
                    tag_map.tag_id,
                    tag_map.position,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn load_table<T: Mergeable>(
        &self,
        sql: &str,
        parse: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<Option<T>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = Vec::new();
        for row in stmt.query_map([], parse)? {
            rows.push(row?);
        }

        let max_id = rows.iter().map(Mergeable::id).max().unwrap_or(0);
        let mut list: Vec<Option<T>> = Vec::new();
        list.resize_with(max_id as usize + 1, || None);
        for row in rows {
            let id = row.id();
            if id <= 0 {
                return Err(Error::Invariant(format!(
                    "{} row with non-positive ID {id}",
                    T::ENTITY_NAME
                )));
            }
            list[id as usize] = Some(row);
        }
        Ok(list)
    }
}

fn parse_location(row: &Row<'_>) -> rusqlite::Result<Location> {
    Ok(Location {
        location_id: row.get(0)?,
        book_number: row.get(1)?,
        chapter_number: row.get(2)?,
        document_id: row.get(3)?,
        track: row.get(4)?,
        issue_tag_number: row.get(5)?,
        key_symbol: row.get(6)?,
        meps_language: row.get(7)?,
        location_type: row.get(8)?,
        title: row.get(9)?,
    })
}

fn parse_bookmark(row: &Row<'_>) -> rusqlite::Result<Bookmark> {
    Ok(Bookmark {
        bookmark_id: row.get(0)?,
        location_id: row.get(1)?,
        publication_location_id: row.get(2)?,
        slot: row.get(3)?,
        title: row.get(4)?,
        snippet: row.get(5)?,
        block_type: row.get(6)?,
        block_identifier: row.get(7)?,
    })
}

fn parse_tag(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        tag_id: row.get(0)?,
        tag_type: row.get(1)?,
        name: row.get(2)?,
    })
}

fn parse_tag_map(row: &Row<'_>) -> rusqlite::Result<TagMap> {
    Ok(TagMap {
        tag_map_id: row.get(0)?,
        playlist_item_id: row.get(1)?,
        location_id: row.get(2)?,
        note_id: row.get(3)?,
        tag_id: row.get(4)?,
        position: row.get(5)?,
    })
}

fn parse_user_mark(row: &Row<'_>) -> rusqlite::Result<UserMark> {
    Ok(UserMark {
        user_mark_id: row.get(0)?,
        color_index: row.get(1)?,
        location_id: row.get(2)?,
        style_index: row.get(3)?,
        user_mark_guid: row.get(4)?,
        version: row.get(5)?,
    })
}

fn parse_block_range(row: &Row<'_>) -> rusqlite::Result<BlockRange> {
    Ok(BlockRange {
        block_range_id: row.get(0)?,
        block_type: row.get(1)?,
        identifier: row.get(2)?,
        start_token: row.get(3)?,
        end_token: row.get(4)?,
        user_mark_id: row.get(5)?,
    })
}

fn parse_note(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        note_id: row.get(0)?,
        guid: row.get(1)?,
        user_mark_id: row.get(2)?,
        location_id: row.get(3)?,
        title: row.get(4)?,
        content: row.get(5)?,
        last_modified: row.get(6)?,
        block_type: row.get(7)?,
        block_identifier: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            locations: vec![
                None,
                Some(Location {
                    location_id: 1,
                    book_number: Some(43),
                    chapter_number: Some(3),
                    key_symbol: Some("nwt".to_string()),
                    meps_language: 2,
                    title: Some("John 3".to_string()),
                    ..Location::default()
                }),
                Some(Location {
                    location_id: 2,
                    document_id: Some(1102023),
                    meps_language: 2,
                    location_type: 1,
                    ..Location::default()
                }),
            ],
            bookmarks: vec![
                None,
                Some(Bookmark {
                    bookmark_id: 1,
                    location_id: 1,
                    publication_location_id: 2,
                    slot: 0,
                    title: "Reading".to_string(),
                    snippet: Some("in the beginning".to_string()),
                    ..Bookmark::default()
                }),
            ],
            tags: vec![
                None,
                Some(Tag {
                    tag_id: 1,
                    tag_type: 1,
                    name: "study".to_string(),
                }),
            ],
            tag_maps: vec![
                None,
                Some(TagMap {
                    tag_map_id: 1,
                    note_id: Some(1),
                    tag_id: 1,
                    position: 0,
                    ..TagMap::default()
                }),
            ],
            user_marks: vec![
                None,
                Some(UserMark {
                    user_mark_id: 1,
                    color_index: 2,
                    location_id: 1,
                    user_mark_guid: "2a5c1fae-cc35-4b24-a388-4a08b8e83f2f".to_string(),
                    version: 1,
                    ..UserMark::default()
                }),
            ],
            block_ranges: vec![
                None,
                Some(BlockRange {
                    block_range_id: 1,
                    block_type: 1,
                    identifier: 16,
                    start_token: Some(2),
                    end_token: Some(11),
                    user_mark_id: 1,
                }),
            ],
            notes: vec![
                None,
                Some(Note {
                    note_id: 1,
                    guid: "47a5e7b4-22d6-4f35-9f4c-3a8e54c5c6a3".to_string(),
                    user_mark_id: Some(1),
                    location_id: Some(1),
                    title: Some("A thought".to_string()),
                    content: Some("worth keeping".to_string()),
                    last_modified: "2025-11-02T09:15:00+00:00".to_string(),
                    block_type: 1,
                    ..Note::default()
                }),
            ],
        }
    }

    #[test]
    fn store_then_load_round_trips() {
        let db = Database::open_in_memory().unwrap();
        let repo = SnapshotRepository::new(db.connection());
        let snapshot = sample_snapshot();

        repo.store(&snapshot).unwrap();
        let loaded = repo.load().unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn load_reconstructs_sparse_indices() {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute(
                "INSERT INTO Location (LocationId, MepsLanguage) VALUES (3, 2)",
                [],
            )
            .unwrap();
        let repo = SnapshotRepository::new(db.connection());

        let snapshot = repo.load().unwrap();
        assert_eq!(snapshot.locations.len(), 4);
        assert!(snapshot.locations[0].is_none());
        assert!(snapshot.locations[1].is_none());
        assert!(snapshot.locations[2].is_none());
        assert_eq!(snapshot.locations[3].as_ref().unwrap().location_id, 3);
    }

    #[test]
    fn empty_database_loads_empty_lists() {
        let db = Database::open_in_memory().unwrap();
        let repo = SnapshotRepository::new(db.connection());

        let snapshot = repo.load().unwrap();
        assert_eq!(snapshot.locations.len(), 1);
        assert!(snapshot.locations[0].is_none());
        assert_eq!(snapshot.row_counts().map(|(_, count)| count), [0; 7]);
    }

    #[test]
    fn non_positive_id_is_corrupt_input() {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute(
                "INSERT INTO Location (LocationId, MepsLanguage) VALUES (0, 2)",
                [],
            )
            .unwrap();
        let repo = SnapshotRepository::new(db.connection());

        assert!(matches!(repo.load(), Err(Error::Invariant(_))));
    }
}

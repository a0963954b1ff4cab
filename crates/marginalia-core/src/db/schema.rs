//! Annotation database schema (version 8).

use rusqlite::Connection;

use crate::error::Result;

/// Create all annotation tables.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS Location (
            LocationId INTEGER NOT NULL PRIMARY KEY,
            BookNumber INTEGER,
            ChapterNumber INTEGER,
            DocumentId INTEGER,
            Track INTEGER,
            IssueTagNumber INTEGER NOT NULL DEFAULT 0,
            KeySymbol TEXT,
            MepsLanguage INTEGER NOT NULL DEFAULT 0,
            Type INTEGER NOT NULL DEFAULT 0,
            Title TEXT
        );

        CREATE TABLE IF NOT EXISTS Bookmark (
            BookmarkId INTEGER NOT NULL PRIMARY KEY,
            LocationId INTEGER NOT NULL REFERENCES Location (LocationId),
            PublicationLocationId INTEGER NOT NULL REFERENCES Location (LocationId),
            Slot INTEGER NOT NULL,
            Title TEXT NOT NULL,
            Snippet TEXT,
            BlockType INTEGER NOT NULL DEFAULT 0,
            BlockIdentifier INTEGER,
            UNIQUE (PublicationLocationId, Slot)
        );

        CREATE TABLE IF NOT EXISTS Tag (
            TagId INTEGER NOT NULL PRIMARY KEY,
            Type INTEGER NOT NULL DEFAULT 0,
            Name TEXT NOT NULL,
            UNIQUE (Type, Name)
        );

        CREATE TABLE IF NOT EXISTS UserMark (
            UserMarkId INTEGER NOT NULL PRIMARY KEY,
            ColorIndex INTEGER NOT NULL DEFAULT 0,
            LocationId INTEGER NOT NULL REFERENCES Location (LocationId),
            StyleIndex INTEGER NOT NULL DEFAULT 0,
            UserMarkGuid TEXT NOT NULL UNIQUE,
            Version INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS BlockRange (
            BlockRangeId INTEGER NOT NULL PRIMARY KEY,
            BlockType INTEGER NOT NULL DEFAULT 0,
            Identifier INTEGER NOT NULL,
            StartToken INTEGER,
            EndToken INTEGER,
            UserMarkId INTEGER NOT NULL REFERENCES UserMark (UserMarkId)
        );

        CREATE TABLE IF NOT EXISTS Note (
            NoteId INTEGER NOT NULL PRIMARY KEY,
            Guid TEXT NOT NULL UNIQUE,
            UserMarkId INTEGER REFERENCES UserMark (UserMarkId),
            LocationId INTEGER REFERENCES Location (LocationId),
            Title TEXT,
            Content TEXT,
            LastModified TEXT NOT NULL DEFAULT '',
            BlockType INTEGER NOT NULL DEFAULT 0,
            BlockIdentifier INTEGER
        );

        CREATE TABLE IF NOT EXISTS TagMap (
            TagMapId INTEGER NOT NULL PRIMARY KEY,
            PlaylistItemId INTEGER,
            LocationId INTEGER REFERENCES Location (LocationId),
            NoteId INTEGER REFERENCES Note (NoteId),
            TagId INTEGER NOT NULL REFERENCES Tag (TagId),
            Position INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS IX_BlockRange_UserMarkId ON BlockRange (UserMarkId);
        CREATE INDEX IF NOT EXISTS IX_Note_LocationId ON Note (LocationId);
        CREATE INDEX IF NOT EXISTS IX_TagMap_TagId ON TagMap (TagId);
        ",
    )?;
    Ok(())
}

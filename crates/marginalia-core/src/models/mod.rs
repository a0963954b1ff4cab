//! Annotation models and the contracts that make them mergeable.
//!
//! Every table of the annotation database is represented by one row struct.
//! Rows implement [`Mergeable`], which captures the three notions the merge
//! engine relies on: an integer ID (the primary key), a [`unique
//! key`](Mergeable::unique_key) describing logical identity, and structural
//! equality that excludes the ID. The [`Entity`] enum lifts any row into a
//! single type for the conflict protocol.

mod block_range;
mod bookmark;
mod location;
mod marked_section;
mod note;
mod snapshot;
mod tag;
mod tag_map;
mod user_mark;

pub use block_range::BlockRange;
pub use bookmark::Bookmark;
pub use location::Location;
pub use marked_section::MarkedSection;
pub use note::Note;
pub use snapshot::Snapshot;
pub use tag::Tag;
pub use tag_map::TagMap;
pub use user_mark::UserMark;

use serde::{Deserialize, Serialize};

use crate::merge::MergeError;

/// Mutable view of a foreign-key field selected by name.
#[derive(Debug)]
pub enum FkSlot<'a> {
    /// A mandatory integer reference.
    Required(&'a mut i32),
    /// A nullable reference; `None` means the row does not point anywhere
    /// and must not be rewritten.
    Nullable(&'a mut Option<i32>),
}

/// Contract every annotation row fulfills so the merge engine can
/// deduplicate, renumber and rewrite it.
pub trait Mergeable: Clone {
    /// Table name used in error messages and conflict headers.
    const ENTITY_NAME: &'static str;

    /// Primary-key value of this row.
    fn id(&self) -> i32;

    /// Overwrite the primary-key value.
    fn set_id(&mut self, id: i32);

    /// Deterministic string describing the logical identity of this row.
    /// Two rows with the same unique key refer to the same entity.
    fn unique_key(&self) -> String;

    /// Structural equality excluding the primary key.
    fn matches(&self, other: &Self) -> bool;

    /// Select a foreign-key field by name for rewriting.
    ///
    /// Returns [`MergeError::UnknownField`] for names that do not exist on
    /// this entity and [`MergeError::UnsupportedField`] for fields that
    /// exist but are not rewritable references.
    fn fk_slot(&mut self, field: &str) -> Result<FkSlot<'_>, MergeError>;

    /// Lift this row into the [`Entity`] union.
    fn into_entity(self) -> Entity;

    /// Recover a row of this type from the [`Entity`] union.
    fn from_entity(entity: Entity) -> Option<Self>;
}

/// Tagged union over every entity kind, used wherever the engine must
/// handle "some row" without knowing its table: conflicts, resolutions
/// and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    Location(Location),
    Bookmark(Bookmark),
    Tag(Tag),
    TagMap(TagMap),
    UserMark(UserMark),
    BlockRange(BlockRange),
    Note(Note),
    MarkedSection(MarkedSection),
}

impl Entity {
    /// Table name of the wrapped row.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Location(_) => Location::ENTITY_NAME,
            Self::Bookmark(_) => Bookmark::ENTITY_NAME,
            Self::Tag(_) => Tag::ENTITY_NAME,
            Self::TagMap(_) => TagMap::ENTITY_NAME,
            Self::UserMark(_) => UserMark::ENTITY_NAME,
            Self::BlockRange(_) => BlockRange::ENTITY_NAME,
            Self::Note(_) => Note::ENTITY_NAME,
            Self::MarkedSection(_) => MarkedSection::ENTITY_NAME,
        }
    }

    /// Unique key of the wrapped row.
    #[must_use]
    pub fn unique_key(&self) -> String {
        match self {
            Self::Location(row) => row.unique_key(),
            Self::Bookmark(row) => row.unique_key(),
            Self::Tag(row) => row.unique_key(),
            Self::TagMap(row) => row.unique_key(),
            Self::UserMark(row) => row.unique_key(),
            Self::BlockRange(row) => row.unique_key(),
            Self::Note(row) => row.unique_key(),
            Self::MarkedSection(row) => row.unique_key(),
        }
    }

    /// Human-readable rendering of the wrapped row with related entries
    /// resolved against `snapshot`.
    #[must_use]
    pub fn pretty_print(&self, snapshot: &Snapshot) -> String {
        match self {
            Self::Location(row) => row.pretty_print(),
            Self::Bookmark(row) => row.pretty_print(snapshot),
            Self::Tag(row) => row.pretty_print(),
            Self::TagMap(row) => row.pretty_print(snapshot),
            Self::UserMark(row) => row.pretty_print(snapshot),
            Self::BlockRange(row) => row.pretty_print(),
            Self::Note(row) => row.pretty_print(snapshot),
            Self::MarkedSection(row) => row.pretty_print(snapshot),
        }
    }
}

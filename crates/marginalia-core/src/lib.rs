//! marginalia-core - Core library for marginalia
//!
//! This crate contains the annotation models, the SQLite database layer,
//! backup container handling and the merge engine shared by all marginalia
//! interfaces.

pub mod backup;
pub mod db;
pub mod error;
pub mod merge;
pub mod models;
pub mod util;

pub use error::{Error, Result};
pub use models::{Entity, Mergeable, Snapshot};

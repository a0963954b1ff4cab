//! Backup container handling.
//!
//! A backup is either a directory holding `manifest.json` plus the
//! database file it names, or a bare SQLite file. Directory backups are
//! gated on their manifest before any row is read; bare files skip the
//! gate. Exports stage the database under a temporary name and move it
//! into place only after every row is written, so a failed merge never
//! leaves a partial destination behind.

mod manifest;

pub use manifest::{file_sha256, Manifest, DATABASE_NAME, MANIFEST_VERSION, SCHEMA_VERSION};

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::db::{Database, SnapshotRepository};
use crate::error::{Error, Result};
use crate::models::Snapshot;

/// Name of the manifest file inside a backup directory.
pub const MANIFEST_NAME: &str = "manifest.json";

/// One imported backup: its snapshot and, for directory backups, the
/// validated manifest it came with.
#[derive(Debug, Clone, PartialEq)]
pub struct Backup {
    pub manifest: Option<Manifest>,
    pub snapshot: Snapshot,
}

impl Backup {
    /// Import a backup from a directory or a bare database file.
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            let manifest = Manifest::import(&path.join(MANIFEST_NAME))?;
            manifest.validate()?;
            let db_path = path.join(&manifest.user_data_backup.database_name);
            if !db_path.is_file() {
                return Err(Error::Manifest(format!(
                    "manifest names {} but the file is missing",
                    manifest.user_data_backup.database_name
                )));
            }
            debug!(path = %db_path.display(), "opening backup database");
            let db = Database::open(&db_path)?;
            let snapshot = SnapshotRepository::new(db.connection()).load()?;
            Ok(Self {
                manifest: Some(manifest),
                snapshot,
            })
        } else if path.is_file() {
            debug!(path = %path.display(), "opening bare database");
            let db = Database::open(path)?;
            let snapshot = SnapshotRepository::new(db.connection()).load()?;
            Ok(Self {
                manifest: None,
                snapshot,
            })
        } else {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no backup at {}", path.display()),
            )))
        }
    }

    /// Export a snapshot to `dest`.
    ///
    /// A destination ending in `.db` or `.sqlite` becomes a bare database
    /// file; anything else becomes a backup directory with a freshly
    /// generated manifest.
    pub fn write(snapshot: &Snapshot, dest: &Path, device_name: &str) -> Result<()> {
        if is_bare_database(dest) {
            write_database(snapshot, dest)?;
            return Ok(());
        }

        fs::create_dir_all(dest)?;
        let db_path = dest.join(DATABASE_NAME);
        write_database(snapshot, &db_path)?;

        let name = format!(
            "UserDataBackup_{}_{device_name}",
            chrono::Local::now().format("%Y-%m-%d")
        );
        let manifest = Manifest::generate(&name, &db_path, device_name)?;
        manifest.export(&dest.join(MANIFEST_NAME))?;
        Ok(())
    }
}

fn is_bare_database(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("db" | "sqlite")
    )
}

/// Write all rows to a staged file next to `dest`, then move it into
/// place. Replaces any existing file at `dest` atomically.
fn write_database(snapshot: &Snapshot, dest: &Path) -> Result<()> {
    let staged = dest.with_extension("staging");
    if staged.exists() {
        fs::remove_file(&staged)?;
    }

    let result = (|| {
        let db = Database::create(&staged)?;
        SnapshotRepository::new(db.connection()).store(snapshot)
    })();
    if let Err(error) = result {
        let _ = fs::remove_file(&staged);
        return Err(error);
    }

    fs::rename(&staged, dest)?;
    Ok(())
}

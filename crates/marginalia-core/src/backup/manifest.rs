//! Backup manifest generation and validation.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Annotation database schema version this tool understands.
pub const SCHEMA_VERSION: u32 = 8;

/// Manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// Name of the database file inside a backup directory.
pub const DATABASE_NAME: &str = "user_data.db";

/// Metadata describing one backup: when it was taken, on which device,
/// and a hash of the database it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub creation_date: String,
    pub user_data_backup: UserDataBackup,
    pub name: String,
    #[serde(rename = "type")]
    pub backup_type: u32,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataBackup {
    pub last_modified_date: String,
    pub hash: String,
    pub database_name: String,
    pub schema_version: u32,
    pub device_name: String,
}

impl Manifest {
    /// Build a manifest for the database at `db_path`.
    pub fn generate(name: &str, db_path: &Path, device_name: &str) -> Result<Self> {
        let now = Local::now();
        Ok(Self {
            creation_date: now.format("%Y-%m-%d").to_string(),
            user_data_backup: UserDataBackup {
                last_modified_date: now.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
                hash: file_sha256(db_path)?,
                database_name: DATABASE_NAME.to_string(),
                schema_version: SCHEMA_VERSION,
                device_name: device_name.to_string(),
            },
            name: name.to_string(),
            backup_type: 0,
            version: MANIFEST_VERSION,
        })
    }

    /// Read a manifest from a JSON file.
    pub fn import(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let manifest = serde_json::from_reader(file)?;
        Ok(manifest)
    }

    /// Write the manifest as JSON.
    pub fn export(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Reject manifests this tool cannot merge.
    pub fn validate(&self) -> Result<()> {
        if self.version != MANIFEST_VERSION {
            return Err(Error::Manifest(format!(
                "unsupported manifest version {} (expected {MANIFEST_VERSION})",
                self.version
            )));
        }
        if self.user_data_backup.schema_version != SCHEMA_VERSION {
            return Err(Error::Manifest(format!(
                "unsupported database schema version {} (expected {SCHEMA_VERSION})",
                self.user_data_backup.schema_version
            )));
        }
        if self.user_data_backup.database_name.trim().is_empty() {
            return Err(Error::Manifest(
                "manifest does not name a database file".to_string(),
            ));
        }
        Ok(())
    }
}

/// Hex-encoded SHA-256 of a file's contents.
pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    let digest = hasher.finalize();
    Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
}

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] marginalia_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Conflict resolution aborted before all conflicts were answered")]
    ResolutionAborted,
    #[error("Unrecognized conflict answer {answer:?} in piped input (expected 'l' or 'r')")]
    InvalidAnswer { answer: String },
    #[error("Destination {0} already exists; choose a new path")]
    DestinationExists(PathBuf),
}

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::manifest::ManifestError;

/// Recoverable failure of a single pipeline stage for one item.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Message(String),
}

impl PublishError {
    pub fn message<T: Into<String>>(message: T) -> Self {
        PublishError::Message(message.into())
    }
}

/// Fatal condition that prevents a run from starting.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("queue directory {path} is unreadable: {source}")]
    Queue { path: PathBuf, source: io::Error },
    #[error("archive directory {path} could not be prepared: {source}")]
    Archive { path: PathBuf, source: io::Error },
    #[error("run log {path} could not be opened: {source}")]
    RunLog { path: PathBuf, source: io::Error },
    #[error("another run holds {0}; delete it if no run is active")]
    Locked(PathBuf),
    #[error("could not create run lock in {path}: {source}")]
    Lock { path: PathBuf, source: io::Error },
    #[error("could not prepare HTTP client: {0}")]
    Client(#[source] PublishError),
}

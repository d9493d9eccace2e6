//! Queue discovery, the queued → archived transition, and the run lock.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

pub const LOCK_FILE_NAME: &str = ".pushit.lock";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("could not create archive directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("{0} already exists in the archive")]
    DestinationExists(PathBuf),
    #[error("{path} is neither queued nor archived")]
    Missing { path: PathBuf },
    #[error("could not move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// A content file waiting in the queue directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedItem {
    pub slug: String,
    pub path: PathBuf,
}

/// A content file that has been moved into the archive directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedItem {
    pub slug: String,
    pub path: PathBuf,
}

impl QueuedItem {
    pub fn read_body(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    /// False when the file name is not valid UTF-8; such an item's slug is a lossy rendering.
    pub fn has_utf8_name(&self) -> bool {
        self.path.file_stem().and_then(|stem| stem.to_str()).is_some()
    }

    pub fn file_name(&self) -> &std::ffi::OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }

    /// Move the file into `archive_dir` with a single rename.
    ///
    /// Archiving an item whose file already sits in the archive (and no longer in the queue) is a
    /// no-op that reports the archived location. An existing archive file is never overwritten.
    pub fn archive(&self, archive_dir: &Path) -> Result<ArchivedItem, ArchiveError> {
        let destination = archive_dir.join(self.file_name());
        let archived = ArchivedItem {
            slug: self.slug.clone(),
            path: destination.clone(),
        };

        let queued = self.path.exists();
        let already_archived = destination.exists();
        match (queued, already_archived) {
            (false, true) => {
                debug!(slug = %self.slug, path = %destination.display(), "Item already archived");
                return Ok(archived);
            }
            (true, true) => return Err(ArchiveError::DestinationExists(destination)),
            (false, false) => {
                return Err(ArchiveError::Missing {
                    path: self.path.clone(),
                });
            }
            (true, false) => {}
        }

        fs::create_dir_all(archive_dir).map_err(|source| ArchiveError::CreateDir {
            path: archive_dir.to_path_buf(),
            source,
        })?;
        fs::rename(&self.path, &destination).map_err(|source| ArchiveError::Move {
            from: self.path.clone(),
            to: destination.clone(),
            source,
        })?;
        Ok(archived)
    }
}

/// List queue files with the given extension, ordered by file name.
///
/// Hidden files (including the run lock) are ignored. Names that are not valid UTF-8 are kept
/// with a lossy slug so the run can account for them.
pub fn discover(queue_dir: &Path, extension: &str) -> io::Result<Vec<QueuedItem>> {
    let wanted = extension.trim_start_matches('.');
    let mut items = Vec::new();

    for entry in fs::read_dir(queue_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted));
        if !matches_extension {
            continue;
        }
        let Some(stem) = path.file_stem().map(|stem| stem.to_string_lossy().into_owned()) else {
            continue;
        };
        if stem.starts_with('.') || stem.is_empty() {
            continue;
        }
        items.push(QueuedItem { slug: stem, path });
    }

    items.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(items)
}

/// Exclusive marker preventing two runs from working the same queue. Removed on drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Returns `Ok(None)` when another run already holds the lock.
    pub fn acquire(queue_dir: &Path) -> io::Result<Option<Self>> {
        let path = queue_dir.join(LOCK_FILE_NAME);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(None),
            Err(err) => return Err(err),
        };
        writeln!(
            file,
            "pid={} started={}",
            std::process::id(),
            Utc::now().to_rfc3339()
        )?;
        Ok(Some(Self { path }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %err, "Failed to remove run lock");
        }
    }
}

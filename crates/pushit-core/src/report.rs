//! Per-run tallies and the operator-facing run log.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::duplicate::DuplicateStatus;
use crate::manifest::MissingField;

/// Pipeline stage an item failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Read,
    Schedule,
    Payload,
    Submit,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Read => "read",
            Stage::Schedule => "schedule",
            Stage::Payload => "payload",
            Stage::Submit => "submit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of one queue file within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Succeeded {
        slug: String,
        remote_id: Option<u64>,
        link: Option<String>,
        scheduled_for: Option<DateTime<Utc>>,
        /// Set when the remote accepted the item but the file could not be moved.
        archive_error: Option<String>,
    },
    SkippedNoManifestEntry {
        slug: String,
    },
    SkippedMissingField {
        slug: String,
        field: MissingField,
    },
    SkippedDuplicate {
        slug: String,
        status: DuplicateStatus,
    },
    Failed {
        slug: String,
        stage: Stage,
        error: String,
    },
    /// Dry run only: the item passed every local check.
    Planned {
        slug: String,
        scheduled_for: Option<DateTime<Utc>>,
    },
}

impl ItemOutcome {
    pub fn slug(&self) -> &str {
        match self {
            ItemOutcome::Succeeded { slug, .. }
            | ItemOutcome::SkippedNoManifestEntry { slug }
            | ItemOutcome::SkippedMissingField { slug, .. }
            | ItemOutcome::SkippedDuplicate { slug, .. }
            | ItemOutcome::Failed { slug, .. }
            | ItemOutcome::Planned { slug, .. } => slug,
        }
    }
}

fn fmt_instant(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemOutcome::Succeeded {
                slug,
                remote_id,
                link,
                scheduled_for,
                archive_error,
            } => {
                write!(f, "SUCCEEDED {slug}")?;
                if let Some(id) = remote_id {
                    write!(f, " id={id}")?;
                }
                if let Some(link) = link {
                    write!(f, " {link}")?;
                }
                if let Some(at) = scheduled_for {
                    write!(f, " scheduled {}", fmt_instant(at))?;
                }
                if let Some(err) = archive_error {
                    write!(f, " (NOT ARCHIVED: {err})")?;
                }
                Ok(())
            }
            ItemOutcome::SkippedNoManifestEntry { slug } => {
                write!(f, "SKIPPED {slug}: no manifest entry")
            }
            ItemOutcome::SkippedMissingField { slug, field } => {
                write!(f, "SKIPPED {slug}: missing field '{field}'")
            }
            ItemOutcome::SkippedDuplicate { slug, status } => match status {
                DuplicateStatus::Unknown(reason) => {
                    write!(f, "SKIPPED {slug}: duplicate check inconclusive ({reason})")
                }
                _ => write!(f, "SKIPPED {slug}: already exists remotely"),
            },
            ItemOutcome::Failed { slug, stage, error } => {
                write!(f, "FAILED {slug} at {stage}: {error}")
            }
            ItemOutcome::Planned {
                slug,
                scheduled_for,
            } => {
                write!(f, "PLANNED {slug}")?;
                if let Some(at) = scheduled_for {
                    write!(f, " for {}", fmt_instant(at))?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFailure {
    pub slug: String,
    pub reason: String,
}

/// Counters for one run. Every discovered queue file lands in exactly one counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub succeeded: usize,
    pub skipped_no_manifest_entry: usize,
    pub skipped_missing_field: usize,
    pub skipped_duplicate: usize,
    pub failed: usize,
    pub planned: usize,
    pub media_failures: Vec<MediaFailure>,
    /// Slugs accepted by the remote whose files are still in the queue.
    pub unarchived: Vec<String>,
}

impl RunResult {
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Succeeded {
                slug,
                archive_error,
                ..
            } => {
                self.succeeded += 1;
                if archive_error.is_some() {
                    self.unarchived.push(slug.clone());
                }
            }
            ItemOutcome::SkippedNoManifestEntry { .. } => self.skipped_no_manifest_entry += 1,
            ItemOutcome::SkippedMissingField { .. } => self.skipped_missing_field += 1,
            ItemOutcome::SkippedDuplicate { .. } => self.skipped_duplicate += 1,
            ItemOutcome::Failed { .. } => self.failed += 1,
            ItemOutcome::Planned { .. } => self.planned += 1,
        }
    }

    pub fn record_media_failure(&mut self, slug: &str, reason: &str) {
        self.media_failures.push(MediaFailure {
            slug: slug.to_string(),
            reason: reason.to_string(),
        });
    }

    pub fn total(&self) -> usize {
        self.succeeded
            + self.skipped_no_manifest_entry
            + self.skipped_missing_field
            + self.skipped_duplicate
            + self.failed
            + self.planned
    }

    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "SUMMARY succeeded={} skipped_no_manifest_entry={} skipped_missing_field={} skipped_duplicate={} failed={}",
            self.succeeded,
            self.skipped_no_manifest_entry,
            self.skipped_missing_field,
            self.skipped_duplicate,
            self.failed
        );
        if self.planned > 0 {
            line.push_str(&format!(" planned={}", self.planned));
        }
        if !self.media_failures.is_empty() {
            line.push_str(&format!(" media_failures={}", self.media_failures.len()));
        }
        if !self.unarchived.is_empty() {
            line.push_str(&format!(" unarchived=[{}]", self.unarchived.join(", ")));
        }
        line
    }
}

pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync + 'static>;

#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub kind: ProgressEventKind,
    pub slug: Option<String>,
    pub elapsed_ms: f64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressEventKind {
    Item,
    Note,
    Summary,
}

/// Writes one line per event to the append-only run log, stdout and the progress callback.
pub struct RunReporter {
    file: File,
    path: PathBuf,
    label: String,
    started: Instant,
    echo: bool,
    callback: Option<ProgressCallback>,
}

impl fmt::Debug for RunReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunReporter")
            .field("path", &self.path)
            .field("label", &self.label)
            .field("echo", &self.echo)
            .finish_non_exhaustive()
    }
}

impl RunReporter {
    /// Open (or create) the run log for appending. Existing content is never truncated.
    pub fn open(
        path: &Path,
        label: impl Into<String>,
        callback: Option<ProgressCallback>,
    ) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            label: label.into(),
            started: Instant::now(),
            echo: true,
            callback,
        })
    }

    /// Toggle mirroring lines to stdout.
    pub fn with_stdout(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    fn emit(&mut self, kind: ProgressEventKind, slug: Option<&str>, message: String) {
        let line = format!(
            "{} [{}] {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            self.label,
            message
        );
        if let Err(err) = writeln!(self.file, "{line}").and_then(|()| self.file.flush()) {
            warn!(path = %self.path.display(), error = %err, "Failed to append to run log");
        }
        if self.echo {
            println!("{message}");
        }
        if let Some(cb) = &self.callback {
            cb(ProgressEvent {
                kind,
                slug: slug.map(str::to_string),
                elapsed_ms: self.started.elapsed().as_secs_f64() * 1_000.0,
                message,
            });
        }
    }

    pub fn report(&mut self, outcome: &ItemOutcome) {
        let slug = outcome.slug();
        match outcome {
            ItemOutcome::Failed { stage, error, .. } => {
                warn!(slug, stage = stage.as_str(), error = %error, "Item failed");
            }
            ItemOutcome::Succeeded {
                archive_error: Some(err),
                ..
            } => {
                error!(slug, stage = "archive", error = %err, "Published but not archived");
            }
            _ => info!(slug, outcome = %outcome, "Item processed"),
        }
        self.emit(ProgressEventKind::Item, Some(slug), outcome.to_string());
    }

    pub fn media_failed(&mut self, slug: &str, reason: &str) {
        self.emit(
            ProgressEventKind::Item,
            Some(slug),
            format!("MEDIA {slug}: {reason}; continuing without featured image"),
        );
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.emit(ProgressEventKind::Note, None, message.into());
    }

    pub fn summary(&mut self, result: &RunResult) {
        let line = result.summary_line();
        info!(
            succeeded = result.succeeded,
            failed = result.failed,
            skipped_duplicate = result.skipped_duplicate,
            total = result.total(),
            "Run finished"
        );
        self.emit(ProgressEventKind::Summary, None, line);
    }
}

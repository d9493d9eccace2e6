//! The publishing pass: queue → manifest join → remote stages → archive.

use std::fs;
use std::io;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::{PostStatus, ProfileDefinition, PublishConfig, resolve_profile};
use crate::duplicate::check_duplicate;
use crate::error::{PublishError, RunError};
use crate::manifest::Manifest;
use crate::media::{MediaOutcome, upload_featured_image};
use crate::payload::{ContentItem, build_payload};
use crate::queue::{QueuedItem, RunLock, discover};
use crate::remote::{PublishApi, RemoteUser, WordPressClient};
use crate::report::{ItemOutcome, ProgressCallback, RunReporter, RunResult, Stage};

/// Knobs for a single run that are not part of the stored profile.
#[derive(Clone, Default)]
pub struct RunOptions {
    /// Validate and report without network calls or file moves.
    pub dry_run: bool,
    /// Fixed reference time for scheduling; defaults to the wall clock.
    pub now: Option<DateTime<Utc>>,
    /// Suppress the stdout mirror of the run log.
    pub quiet: bool,
    pub progress: Option<ProgressCallback>,
}

/// Resolve a stored or loaded profile and publish its queue.
pub async fn run_definition(
    profile: &ProfileDefinition,
    options: RunOptions,
) -> Result<RunResult, RunError> {
    let config = resolve_profile(profile)?;
    run_profile(&config, options).await
}

/// Publish everything in the profile's queue over HTTP.
pub async fn run_profile(config: &PublishConfig, options: RunOptions) -> Result<RunResult, RunError> {
    let client = WordPressClient::new(config).map_err(RunError::Client)?;
    run_with_api(config, &client, options).await
}

/// Verify the credentials by fetching the authenticated account.
pub async fn check_connection(config: &PublishConfig) -> Result<RemoteUser, PublishError> {
    let client = WordPressClient::new(config)?;
    client.current_user().await
}

/// Run the pipeline against any [`PublishApi`]. Fatal start-up problems are returned as
/// [`RunError`]; everything after that is folded into the [`RunResult`].
pub async fn run_with_api<A: PublishApi>(
    config: &PublishConfig,
    api: &A,
    options: RunOptions,
) -> Result<RunResult, RunError> {
    let queue_dir = &config.queue_dir;
    let queue_meta = fs::metadata(queue_dir).map_err(|source| RunError::Queue {
        path: queue_dir.clone(),
        source,
    })?;
    if !queue_meta.is_dir() {
        return Err(RunError::Queue {
            path: queue_dir.clone(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let _lock = match RunLock::acquire(queue_dir) {
        Ok(Some(lock)) => lock,
        Ok(None) => return Err(RunError::Locked(queue_dir.join(crate::queue::LOCK_FILE_NAME))),
        Err(source) => {
            return Err(RunError::Lock {
                path: queue_dir.clone(),
                source,
            });
        }
    };

    let manifest = Manifest::load(&config.manifest_path)?;
    let items = discover(queue_dir, &config.content_extension).map_err(|source| {
        RunError::Queue {
            path: queue_dir.clone(),
            source,
        }
    })?;

    if !options.dry_run {
        fs::create_dir_all(&config.archive_dir).map_err(|source| RunError::Archive {
            path: config.archive_dir.clone(),
            source,
        })?;
    }

    let mut reporter = RunReporter::open(
        &config.run_log_path,
        config.profile_name.clone(),
        options.progress.clone(),
    )
    .map_err(|source| RunError::RunLog {
        path: config.run_log_path.clone(),
        source,
    })?
    .with_stdout(!options.quiet);

    for warning in &manifest.warnings {
        warn!(path = %config.manifest_path.display(), "{warning}");
        reporter.note(format!("WARNING {warning}"));
    }

    info!(
        profile = %config.profile_name,
        queued = items.len(),
        manifest_entries = manifest.len(),
        status = %config.status,
        dry_run = options.dry_run,
        "Run started"
    );
    reporter.note(format!(
        "START {} item(s) queued in {} (status {}{})",
        items.len(),
        queue_dir.display(),
        config.status,
        if options.dry_run { ", dry run" } else { "" }
    ));

    let mut pipeline = Pipeline {
        config,
        api,
        now: options.now.unwrap_or_else(Utc::now),
        week_offset: 0,
        dry_run: options.dry_run,
    };

    let mut result = RunResult::default();
    for item in &items {
        let processed = pipeline.process(item, &manifest).await;
        if let Some(reason) = processed.media_failure.as_deref() {
            result.record_media_failure(&item.slug, reason);
            reporter.media_failed(&item.slug, reason);
        }
        result.record(&processed.outcome);
        reporter.report(&processed.outcome);
    }

    reporter.summary(&result);
    Ok(result)
}

struct Processed {
    outcome: ItemOutcome,
    media_failure: Option<String>,
}

impl From<ItemOutcome> for Processed {
    fn from(outcome: ItemOutcome) -> Self {
        Self {
            outcome,
            media_failure: None,
        }
    }
}

struct Pipeline<'a, A> {
    config: &'a PublishConfig,
    api: &'a A,
    now: DateTime<Utc>,
    /// Advanced after each successfully scheduled item so consecutive items land a week apart.
    week_offset: i64,
    dry_run: bool,
}

impl<A: PublishApi> Pipeline<'_, A> {
    async fn process(&mut self, item: &QueuedItem, manifest: &Manifest) -> Processed {
        let slug = item.slug.clone();
        let failed = |stage: Stage, error: String| ItemOutcome::Failed {
            slug: item.slug.clone(),
            stage,
            error,
        };

        if !item.has_utf8_name() {
            return failed(Stage::Read, "file name is not valid UTF-8".to_string()).into();
        }
        let Some(entry) = manifest.get(&slug) else {
            return ItemOutcome::SkippedNoManifestEntry { slug }.into();
        };
        let meta = match entry.validate(&slug, self.config.require_seo_fields) {
            Ok(meta) => meta,
            Err(field) => return ItemOutcome::SkippedMissingField { slug, field }.into(),
        };
        let body = match item.read_body() {
            Ok(body) => body,
            Err(err) => return failed(Stage::Read, err.to_string()).into(),
        };
        let content = ContentItem { meta, body };

        let scheduled_for = match self.schedule_slot() {
            Some(slot) => match slot.occurrence(self.now, self.week_offset) {
                Ok(at) => Some(at),
                Err(err) => return failed(Stage::Schedule, err.to_string()).into(),
            },
            None => None,
        };

        if self.dry_run {
            if let Err(err) = build_payload(
                &content,
                self.config.status,
                scheduled_for,
                None,
                &self.config.category_ids,
            ) {
                return failed(Stage::Payload, err.to_string()).into();
            }
            if scheduled_for.is_some() {
                self.week_offset += 1;
            }
            return ItemOutcome::Planned {
                slug,
                scheduled_for,
            }
            .into();
        }

        let duplicate = check_duplicate(self.api, &slug).await;
        if duplicate.should_skip() {
            return ItemOutcome::SkippedDuplicate {
                slug,
                status: duplicate,
            }
            .into();
        }

        let media_reference = content
            .meta
            .media
            .as_deref()
            .or(self.config.default_media.as_deref());
        let media = upload_featured_image(self.api, media_reference, &slug).await;
        let media_failure = match &media {
            MediaOutcome::Failed(reason) => Some(reason.clone()),
            MediaOutcome::Attached(_) | MediaOutcome::NotRequested => None,
        };

        let outcome = self.submit(item, &content, scheduled_for, media.media_id()).await;
        Processed {
            outcome,
            media_failure,
        }
    }

    fn schedule_slot(&self) -> Option<crate::schedule::ScheduleSlot> {
        match self.config.status {
            PostStatus::Schedule => self.config.schedule,
            PostStatus::Draft | PostStatus::Publish => None,
        }
    }

    async fn submit(
        &mut self,
        item: &QueuedItem,
        content: &ContentItem,
        scheduled_for: Option<DateTime<Utc>>,
        media_id: Option<u64>,
    ) -> ItemOutcome {
        let slug = item.slug.clone();
        let payload = match build_payload(
            content,
            self.config.status,
            scheduled_for,
            media_id,
            &self.config.category_ids,
        ) {
            Ok(payload) => payload,
            Err(err) => {
                return ItemOutcome::Failed {
                    slug,
                    stage: Stage::Payload,
                    error: err.to_string(),
                };
            }
        };

        let created = match self.api.create_post(&payload).await {
            Ok(created) => created,
            Err(err) => {
                return ItemOutcome::Failed {
                    slug,
                    stage: Stage::Submit,
                    error: err.to_string(),
                };
            }
        };
        debug!(slug = %slug, remote_id = ?created.id, "Remote accepted item");
        if scheduled_for.is_some() {
            self.week_offset += 1;
        }

        let archive_error = match item.archive(&self.config.archive_dir) {
            Ok(archived) => {
                debug!(slug = %slug, path = %archived.path.display(), "Archived");
                None
            }
            Err(err) => Some(err.to_string()),
        };

        ItemOutcome::Succeeded {
            slug,
            remote_id: created.id,
            link: created.link,
            scheduled_for,
            archive_error,
        }
    }
}

//! Core library for the `pushit` publishing pipeline.

pub mod config;
pub mod duplicate;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod media;
pub mod payload;
pub mod queue;
pub mod remote;
pub mod report;
pub mod runtime;
pub mod schedule;
pub mod secret_store;

pub use config::{
    ConfigError, ConfigLoadResult, ConfigSource, Credentials, FileConfig, PostStatus,
    ProfileDefinition, PublishConfig, RunOverrides, SecretValue, apply_run_overrides,
    config_directory, config_path, load_config, load_profile_file, resolve_profile, save_config,
};
pub use duplicate::{DuplicateStatus, check_duplicate};
pub use error::{PublishError, RunError};
pub use manifest::{ContentMeta, Manifest, ManifestEntry, MissingField};
pub use media::{MediaOutcome, MediaReference, upload_featured_image};
pub use payload::{ContentItem, PostPayload, WireStatus, build_payload};
pub use queue::{ArchivedItem, QueuedItem, RunLock};
pub use remote::{CreatedPost, MediaUpload, PublishApi, RemotePost, RemoteUser, WordPressClient};
pub use report::{
    ItemOutcome, ProgressCallback, ProgressEvent, ProgressEventKind, RunReporter, RunResult, Stage,
};
pub use runtime::{RunOptions, check_connection, run_definition, run_profile, run_with_api};
pub use schedule::{ScheduleSlot, next_occurrence};

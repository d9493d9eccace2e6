use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use pushit_core::config::{PostStatus, RunOverrides};

/// Top-level CLI entrypoint.
#[derive(Parser, Debug, Clone)]
#[command(name = "pushit", version, about, long_about = None)]
pub struct Cli {
    /// Mirror diagnostics to stderr; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Publish every queued item for one profile.
    Run(RunArgs),
    /// Verify the profile's credentials against the remote site.
    Check(ProfileSelector),
    /// Manage stored profiles in config.toml.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Manage stored application passwords.
    #[command(subcommand)]
    Secret(SecretCommand),
}

/// Exactly one source for the profile: a stored name or a serialized profile file.
#[derive(Debug, Clone, Args, Default)]
#[group(required = true, multiple = false)]
pub struct ProfileSelector {
    /// Name of a profile stored in config.toml.
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Path to a JSON or TOML profile file.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub selector: ProfileSelector,

    /// Validate and report without contacting the site or moving files.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Override the publish status (draft, publish or schedule).
    #[arg(long, value_parser = parse_status)]
    pub status: Option<PostStatus>,

    /// Override the queue directory.
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub queue: Option<String>,

    /// Override the archive directory.
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub archive: Option<String>,

    /// Override the manifest path.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub manifest: Option<String>,

    /// Override the default featured image ("none" disables it).
    #[arg(long = "featured-image", value_name = "URL_OR_PATH")]
    pub featured_image: Option<String>,

    /// Do not mirror run log lines to stdout.
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub quiet: bool,
}

impl RunArgs {
    pub fn to_run_overrides(&self) -> RunOverrides {
        RunOverrides {
            status: self.status,
            queue_dir: self.queue.clone(),
            archive_dir: self.archive.clone(),
            manifest_path: self.manifest.clone(),
            featured_image: self
                .featured_image
                .as_deref()
                .map(parse_optional_field),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProfileCommand {
    /// Create a new stored profile.
    #[command(alias = "add")]
    Create(ProfileCreateArgs),
    /// Update fields of an existing profile.
    Update(ProfileUpdateArgs),
    /// Delete a profile and its stored password.
    #[command(alias = "remove")]
    Delete(ProfileNameArgs),
    /// List stored profiles.
    #[command(alias = "ls")]
    List,
    /// Print one profile (the password is never shown).
    Show(ProfileNameArgs),
    /// Store a JSON or TOML profile file, replacing any profile with the same name.
    Import(ProfileImportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ProfileCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "site-url", value_name = "URL")]
    pub site_url: String,
    #[arg(long)]
    pub username: String,
    #[arg(long = "content-dir", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub content_dir: String,
    /// Category ids, comma separated or repeated.
    #[arg(long = "category", value_delimiter = ',', value_name = "ID")]
    pub categories: Vec<u64>,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<PostStatus>,
    #[arg(long = "featured-image", value_name = "URL_OR_PATH")]
    pub featured_image: Option<String>,
    #[arg(long = "schedule-day", value_name = "WEEKDAY")]
    pub schedule_day: Option<String>,
    #[arg(long = "schedule-time", value_name = "HH:MM")]
    pub schedule_time: Option<String>,
    #[arg(long)]
    pub timezone: Option<String>,
    #[arg(long = "extension")]
    pub content_extension: Option<String>,
    /// Require rank_math_description and focus_keyword in every manifest entry.
    #[arg(long = "require-seo", action = ArgAction::SetTrue)]
    pub require_seo_fields: bool,
    #[arg(long = "timeout-secs", value_name = "SECONDS")]
    pub request_timeout_secs: Option<u64>,
    /// Prompt for the application password after creating the profile.
    #[arg(long = "ask-password", action = ArgAction::SetTrue)]
    pub ask_password: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "site-url", value_name = "URL")]
    pub site_url: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long = "content-dir", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub content_dir: Option<String>,
    /// Replace the category ids, comma separated or repeated.
    #[arg(long = "category", value_delimiter = ',', value_name = "ID")]
    pub categories: Option<Vec<u64>>,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<PostStatus>,
    /// New default featured image ("none" clears it).
    #[arg(long = "featured-image", value_name = "URL_OR_PATH")]
    pub featured_image: Option<String>,
    #[arg(long = "schedule-day", value_name = "WEEKDAY")]
    pub schedule_day: Option<String>,
    #[arg(long = "schedule-time", value_name = "HH:MM")]
    pub schedule_time: Option<String>,
    #[arg(long)]
    pub timezone: Option<String>,
    /// Queue directory override ("none" restores the default).
    #[arg(long = "queue-dir", value_name = "DIR")]
    pub queue_dir: Option<String>,
    /// Archive directory override ("none" restores the default).
    #[arg(long = "archive-dir", value_name = "DIR")]
    pub archive_dir: Option<String>,
    /// Manifest path override ("none" restores the default).
    #[arg(long = "manifest", value_name = "FILE")]
    pub manifest_path: Option<String>,
    /// Run log path override ("none" restores the default).
    #[arg(long = "run-log", value_name = "FILE")]
    pub run_log_path: Option<String>,
    #[arg(long = "extension")]
    pub content_extension: Option<String>,
    #[arg(
        long = "require-seo",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub require_seo_fields: Option<bool>,
    #[arg(long = "timeout-secs", value_name = "SECONDS")]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct ProfileNameArgs {
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, Clone, Args)]
pub struct ProfileImportArgs {
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SecretCommand {
    /// Store the application password for a profile (prompts when --password is omitted).
    SetPassword {
        #[arg(long, value_name = "NAME")]
        profile: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Remove the stored application password for a profile.
    ClearPassword {
        #[arg(long, value_name = "NAME")]
        profile: String,
    },
}

fn parse_status(value: &str) -> Result<PostStatus, String> {
    value.parse()
}

/// `""`, `none`, `null` and `unset` mean "no value".
pub fn parse_optional_field(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || matches!(
            trimmed.to_ascii_lowercase().as_str(),
            "none" | "null" | "unset"
        )
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

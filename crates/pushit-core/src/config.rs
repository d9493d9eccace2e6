use crate::schedule::{self, ScheduleError, ScheduleSlot};
use crate::secret_store::{self, SecretReference, SecretStoreError};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "pushit";
const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_DIR_ENV: &str = "PUSHIT_CONFIG_DIR";
const CURRENT_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_QUEUE_DIR_NAME: &str = "pre-post";
pub const DEFAULT_ARCHIVE_DIR_NAME: &str = "posted";
pub const DEFAULT_MANIFEST_FILE_NAME: &str = "posts.json";
pub const DEFAULT_RUN_LOG_FILE_NAME: &str = "push.log";
pub const DEFAULT_CONTENT_EXTENSION: &str = "html";
pub const DEFAULT_SCHEDULE_DAY: &str = "Monday";
pub const DEFAULT_SCHEDULE_TIME: &str = "09:00";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Result returned by [`load_config`], capturing the source and any non-fatal issues.
#[derive(Debug, Clone)]
pub struct ConfigLoadResult {
    pub config: FileConfig,
    pub warnings: Vec<String>,
    pub source: ConfigSource,
}

/// Indicates where the configuration was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// No persisted configuration was found or usable; defaults were synthesized.
    Default,
    /// Configuration was read from `config.toml`.
    File,
    /// `config.toml` exists but could not be used; defaults stand in and must not be saved over it.
    Rejected,
}

impl ConfigLoadResult {
    /// The loaded store, or an error when saving it would overwrite a file that failed to load.
    pub fn into_writable(self, path: &Path) -> Result<FileConfig, ConfigError> {
        match self.source {
            ConfigSource::Rejected => Err(ConfigError::Invalid(format!(
                "Refusing to overwrite {}: it could not be loaded. Fix or move it aside first.",
                path.display()
            ))),
            ConfigSource::Default | ConfigSource::File => Ok(self.config),
        }
    }
}

/// Errors raised while reading, writing or resolving configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Ser(toml::ser::Error),
    De(toml::de::Error),
    Json(serde_json::Error),
    Secret(SecretStoreError),
    Schedule(ScheduleError),
    ProfileNotFound(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {err}"),
            ConfigError::Ser(err) => write!(f, "TOML serialization error: {err}"),
            ConfigError::De(err) => write!(f, "TOML parse error: {err}"),
            ConfigError::Json(err) => write!(f, "JSON parse error: {err}"),
            ConfigError::Secret(err) => write!(f, "Secret storage error: {err}"),
            ConfigError::Schedule(err) => write!(f, "Invalid schedule: {err}"),
            ConfigError::ProfileNotFound(name) => write!(f, "Profile '{name}' not found"),
            ConfigError::Invalid(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Ser(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::De(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<SecretStoreError> for ConfigError {
    fn from(value: SecretStoreError) -> Self {
        Self::Secret(value)
    }
}

impl From<ScheduleError> for ConfigError {
    fn from(value: ScheduleError) -> Self {
        Self::Schedule(value)
    }
}

/// Caller-facing publish status. `Schedule` is sent to the remote as `future`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Publish,
    Schedule,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Publish => "publish",
            PostStatus::Schedule => "schedule",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "publish" => Ok(PostStatus::Publish),
            "schedule" | "future" => Ok(PostStatus::Schedule),
            other => Err(format!(
                "Unknown post status '{other}' (expected draft, publish or schedule)"
            )),
        }
    }
}

/// Disk-backed configuration schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "FileConfig::schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub profiles: Vec<ProfileDefinition>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            profiles: Vec::new(),
        }
    }
}

impl FileConfig {
    const fn schema_version() -> u32 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn find_profile(&self, name: &str) -> Option<&ProfileDefinition> {
        self.profiles.iter().find(|profile| profile.name == name)
    }

    pub fn find_profile_mut(&mut self, name: &str) -> Option<&mut ProfileDefinition> {
        self.profiles.iter_mut().find(|profile| profile.name == name)
    }
}

pub fn profile_id_from_name(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut previous_dash = false;
    for ch in name.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() {
            id.push(lower);
            previous_dash = false;
        } else if !previous_dash {
            id.push('-');
            previous_dash = true;
        }
    }
    while id.starts_with('-') {
        id.remove(0);
    }
    while id.ends_with('-') {
        id.pop();
    }
    if id.is_empty() {
        "profile".to_string()
    } else {
        id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SecretValue {
    Plain(String),
    Reference(SecretReference),
}

impl SecretValue {
    pub fn as_reference(&self) -> Option<&SecretReference> {
        match self {
            SecretValue::Reference(reference) => Some(reference),
            SecretValue::Plain(_) => None,
        }
    }

    fn take_plain(&self) -> Option<String> {
        match self {
            SecretValue::Plain(value) => Some(value.clone()),
            SecretValue::Reference(_) => None,
        }
    }
}

/// One client site: where to publish, as whom, and where its content lives.
///
/// Field aliases keep JSON profiles written for the older desktop shell loadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "wp_url")]
    pub site_url: String,
    pub username: String,
    #[serde(default)]
    pub app_password: Option<SecretValue>,
    #[serde(default)]
    pub category_ids: Vec<u64>,
    #[serde(default)]
    pub post_status: PostStatus,
    #[serde(default, alias = "featured_image_url")]
    pub featured_image: Option<String>,
    #[serde(default = "ProfileDefinition::default_schedule_day")]
    pub schedule_day: String,
    #[serde(default = "ProfileDefinition::default_schedule_time")]
    pub schedule_time: String,
    #[serde(default = "ProfileDefinition::default_timezone")]
    pub timezone: String,
    pub content_dir: String,
    #[serde(default)]
    pub queue_dir: Option<String>,
    #[serde(default)]
    pub archive_dir: Option<String>,
    #[serde(default)]
    pub manifest_path: Option<String>,
    #[serde(default)]
    pub run_log_path: Option<String>,
    #[serde(default = "ProfileDefinition::default_content_extension")]
    pub content_extension: String,
    #[serde(default)]
    pub require_seo_fields: bool,
    #[serde(default = "ProfileDefinition::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ProfileDefinition {
    pub fn new(
        name: impl Into<String>,
        site_url: impl Into<String>,
        username: impl Into<String>,
        content_dir: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            site_url: site_url.into(),
            username: username.into(),
            app_password: None,
            category_ids: Vec::new(),
            post_status: PostStatus::default(),
            featured_image: None,
            schedule_day: Self::default_schedule_day(),
            schedule_time: Self::default_schedule_time(),
            timezone: Self::default_timezone(),
            content_dir: content_dir.into(),
            queue_dir: None,
            archive_dir: None,
            manifest_path: None,
            run_log_path: None,
            content_extension: Self::default_content_extension(),
            require_seo_fields: false,
            request_timeout_secs: Self::default_request_timeout_secs(),
        }
    }

    fn default_schedule_day() -> String {
        DEFAULT_SCHEDULE_DAY.to_string()
    }

    fn default_schedule_time() -> String {
        DEFAULT_SCHEDULE_TIME.to_string()
    }

    fn default_timezone() -> String {
        DEFAULT_TIMEZONE.to_string()
    }

    fn default_content_extension() -> String {
        DEFAULT_CONTENT_EXTENSION.to_string()
    }

    const fn default_request_timeout_secs() -> u64 {
        DEFAULT_REQUEST_TIMEOUT_SECS
    }

    fn secret_label(&self) -> String {
        format!("app-password-{}", profile_id_from_name(&self.name))
    }

    pub fn set_app_password(&mut self, password: &str) -> Result<(), SecretStoreError> {
        let trimmed = password.trim();
        if trimmed.is_empty() {
            self.clear_app_password()?;
            return Ok(());
        }

        if let Some(SecretValue::Reference(existing)) = self.app_password.as_ref() {
            // Best effort removal of previous stored secret to avoid stale entries.
            let _ = secret_store::delete_secret(existing);
        }

        let reference = secret_store::store_secret(&self.secret_label(), trimmed)?;
        self.app_password = Some(SecretValue::Reference(reference));
        Ok(())
    }

    pub fn clear_app_password(&mut self) -> Result<(), SecretStoreError> {
        if let Some(SecretValue::Reference(reference)) = self.app_password.as_ref() {
            secret_store::delete_secret(reference)?;
        }
        self.app_password = None;
        Ok(())
    }

    pub fn migrate_app_password_secret(&mut self) -> Result<bool, SecretStoreError> {
        let Some(value) = self.app_password.as_ref().and_then(SecretValue::take_plain) else {
            return Ok(false);
        };

        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.app_password = None;
            return Ok(true);
        }

        let reference = secret_store::store_secret(&self.secret_label(), trimmed)?;
        self.app_password = Some(SecretValue::Reference(reference));
        Ok(true)
    }

    pub fn resolve_app_password(&self) -> Result<Option<String>, SecretStoreError> {
        match self.app_password.as_ref() {
            Some(SecretValue::Reference(reference)) => secret_store::load_secret(reference),
            Some(SecretValue::Plain(value)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    pub fn has_app_password(&self) -> bool {
        self.app_password.is_some()
    }

    /// TOML rendering for display. The password is replaced by a note on where it lives.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        shown.app_password = None;
        let mut rendered = toml::to_string_pretty(&shown)?;
        let location = match self.app_password.as_ref() {
            Some(SecretValue::Reference(SecretReference::Keyring { .. })) => "OS keyring",
            Some(SecretValue::Reference(SecretReference::LocalEncrypted { .. })) => {
                "encrypted in config.toml"
            }
            Some(SecretValue::Plain(_)) => "plain text",
            None => "not set",
        };
        rendered.push_str(&format!("# app_password: {location}\n"));
        Ok(rendered)
    }
}

/// Basic-auth credential pair. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fully validated, immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub profile_name: String,
    pub site_url: String,
    pub credentials: Credentials,
    pub category_ids: Vec<u64>,
    pub status: PostStatus,
    pub default_media: Option<String>,
    pub schedule: Option<ScheduleSlot>,
    pub queue_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub run_log_path: PathBuf,
    pub content_extension: String,
    pub require_seo_fields: bool,
    pub request_timeout: Duration,
}

/// Overrides sourced from the command line for a single run.
#[derive(Debug, Default, Clone)]
pub struct RunOverrides {
    pub status: Option<PostStatus>,
    pub queue_dir: Option<String>,
    pub archive_dir: Option<String>,
    pub manifest_path: Option<String>,
    pub featured_image: Option<Option<String>>,
}

impl RunOverrides {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.queue_dir.is_none()
            && self.archive_dir.is_none()
            && self.manifest_path.is_none()
            && self.featured_image.is_none()
    }
}

/// Merge run overrides into a profile before it is resolved.
pub fn apply_run_overrides(profile: &mut ProfileDefinition, overrides: &RunOverrides) {
    if let Some(status) = overrides.status {
        profile.post_status = status;
    }
    if let Some(ref value) = overrides.queue_dir {
        profile.queue_dir = Some(value.clone());
    }
    if let Some(ref value) = overrides.archive_dir {
        profile.archive_dir = Some(value.clone());
    }
    if let Some(ref value) = overrides.manifest_path {
        profile.manifest_path = Some(value.clone());
    }
    if let Some(ref value) = overrides.featured_image {
        profile.featured_image = value.clone();
    }
}

fn trimmed_option(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}

fn expand_path(value: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(value.trim()).as_ref())
}

fn layout_path(content_dir: &Path, override_value: &Option<String>, default_name: &str) -> PathBuf {
    match trimmed_option(override_value) {
        Some(value) => expand_path(value),
        None => content_dir.join(default_name),
    }
}

/// Validate a profile and produce the immutable configuration for one run.
pub fn resolve_profile(profile: &ProfileDefinition) -> Result<PublishConfig, ConfigError> {
    let name = if profile.name.trim().is_empty() {
        "default".to_string()
    } else {
        profile.name.trim().to_string()
    };

    let site_url = profile.site_url.trim().trim_end_matches('/').to_string();
    if !(site_url.starts_with("https://") || site_url.starts_with("http://")) {
        return Err(ConfigError::Invalid(format!(
            "Profile '{name}' site_url must start with http:// or https:// (got '{}')",
            profile.site_url
        )));
    }

    let username = profile.username.trim();
    if username.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "Profile '{name}' has no username"
        )));
    }

    let password = profile
        .resolve_app_password()?
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            ConfigError::Invalid(format!(
                "Profile '{name}' has no application password; run `pushit secret set-password --profile \"{name}\"`"
            ))
        })?;

    if profile.content_dir.trim().is_empty() {
        return Err(ConfigError::Invalid(format!(
            "Profile '{name}' has no content_dir"
        )));
    }
    let content_dir = expand_path(&profile.content_dir);

    let schedule = match profile.post_status {
        PostStatus::Schedule => Some(ScheduleSlot::parse(
            &profile.schedule_day,
            &profile.schedule_time,
            &profile.timezone,
        )?),
        PostStatus::Draft | PostStatus::Publish => None,
    };

    let content_extension = profile
        .content_extension
        .trim()
        .trim_start_matches('.')
        .to_string();
    if content_extension.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "Profile '{name}' content_extension must not be empty"
        )));
    }

    if profile.request_timeout_secs == 0 {
        return Err(ConfigError::Invalid(format!(
            "Profile '{name}' request_timeout_secs must be greater than zero"
        )));
    }

    Ok(PublishConfig {
        profile_name: name,
        site_url,
        credentials: Credentials {
            username: username.to_string(),
            password,
        },
        category_ids: profile.category_ids.clone(),
        status: profile.post_status,
        default_media: trimmed_option(&profile.featured_image).map(str::to_string),
        schedule,
        queue_dir: layout_path(&content_dir, &profile.queue_dir, DEFAULT_QUEUE_DIR_NAME),
        archive_dir: layout_path(&content_dir, &profile.archive_dir, DEFAULT_ARCHIVE_DIR_NAME),
        manifest_path: layout_path(
            &content_dir,
            &profile.manifest_path,
            DEFAULT_MANIFEST_FILE_NAME,
        ),
        run_log_path: layout_path(&content_dir, &profile.run_log_path, DEFAULT_RUN_LOG_FILE_NAME),
        content_extension,
        require_seo_fields: profile.require_seo_fields,
        request_timeout: Duration::from_secs(profile.request_timeout_secs),
    })
}

/// Path to the configuration directory (`PUSHIT_CONFIG_DIR` wins over the platform default).
pub fn config_directory() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return expand_path(trimmed);
        }
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Path to `config.toml`.
pub fn config_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// Load the profile store, falling back to defaults with warnings.
pub fn load_config() -> ConfigLoadResult {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> ConfigLoadResult {
    let mut warnings = Vec::new();

    if path.exists() {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<FileConfig>(&raw) {
                Ok(cfg) => {
                    let source = if cfg.schema_version == CURRENT_SCHEMA_VERSION {
                        ConfigSource::File
                    } else {
                        ConfigSource::Rejected
                    };
                    let (cfg, mut sanitize_warnings) = sanitize_config(cfg);
                    warnings.append(&mut sanitize_warnings);
                    return ConfigLoadResult {
                        config: cfg,
                        warnings,
                        source,
                    };
                }
                Err(err) => {
                    warnings.push(format!(
                        "Failed to parse {} as TOML: {}. Falling back to defaults.",
                        path.display(),
                        err
                    ));
                }
            },
            Err(err) => {
                warnings.push(format!(
                    "Failed to read {}: {}. Falling back to defaults.",
                    path.display(),
                    err
                ));
            }
        }
    }

    let source = if path.exists() {
        ConfigSource::Rejected
    } else {
        ConfigSource::Default
    };
    ConfigLoadResult {
        config: FileConfig::default(),
        warnings,
        source,
    }
}

/// Persist the profile store, moving any plain-text passwords into secure storage first.
pub fn save_config(config: &FileConfig) -> Result<(), ConfigError> {
    let mut config_to_write = config.clone();
    for profile in &mut config_to_write.profiles {
        profile.migrate_app_password_secret()?;
    }
    save_config_to(&config_to_write, &config_path())
}

pub fn save_config_to(config: &FileConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(config)?;
    fs::write(path, serialized)?;
    Ok(())
}

/// Read a single serialized profile (`.json` or `.toml`) handed over by an external shell.
///
/// A profile without a name takes the file stem.
pub fn load_profile_file(path: &Path) -> Result<ProfileDefinition, ConfigError> {
    let raw = fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let mut profile: ProfileDefinition = if is_toml {
        toml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };
    if profile.name.trim().is_empty() {
        profile.name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("default")
            .to_string();
    }
    Ok(profile)
}

/// Look up a stored profile by name.
pub fn stored_profile(config: &FileConfig, name: &str) -> Result<ProfileDefinition, ConfigError> {
    config
        .find_profile(name)
        .cloned()
        .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
}

fn sanitize_config(mut config: FileConfig) -> (FileConfig, Vec<String>) {
    let mut warnings = Vec::new();

    if config.schema_version != CURRENT_SCHEMA_VERSION {
        warnings.push(format!(
            "Unknown config schema version {}. Resetting to {}.",
            config.schema_version, CURRENT_SCHEMA_VERSION
        ));
        config = FileConfig::default();
        return (config, warnings);
    }

    let initial_count = config.profiles.len();
    config.profiles.retain(|profile| !profile.name.trim().is_empty());
    if config.profiles.len() < initial_count {
        warnings.push("Removed profiles with an empty name (required field)".to_string());
    }

    let mut names = HashSet::new();
    let mut duplicates = Vec::new();
    config.profiles.retain(|profile| {
        if names.insert(profile.name.clone()) {
            true
        } else {
            duplicates.push(profile.name.clone());
            false
        }
    });
    if !duplicates.is_empty() {
        warnings.push(format!(
            "Removed duplicate profile names: {}",
            duplicates.join(", ")
        ));
    }
    config.profiles.sort_by(|a, b| a.name.cmp(&b.name));

    for profile in &mut config.profiles {
        if let Err(err) = schedule::parse_weekday(&profile.schedule_day) {
            warnings.push(format!(
                "Profile '{}': {}. Resetting schedule_day to {}.",
                profile.name, err, DEFAULT_SCHEDULE_DAY
            ));
            profile.schedule_day = DEFAULT_SCHEDULE_DAY.to_string();
        }
        if let Err(err) = schedule::parse_time_of_day(&profile.schedule_time) {
            warnings.push(format!(
                "Profile '{}': {}. Resetting schedule_time to {}.",
                profile.name, err, DEFAULT_SCHEDULE_TIME
            ));
            profile.schedule_time = DEFAULT_SCHEDULE_TIME.to_string();
        }
        if let Err(err) = schedule::parse_timezone(&profile.timezone) {
            warnings.push(format!(
                "Profile '{}': {}. Resetting timezone to {}.",
                profile.name, err, DEFAULT_TIMEZONE
            ));
            profile.timezone = DEFAULT_TIMEZONE.to_string();
        }
        if profile.request_timeout_secs == 0 {
            warnings.push(format!(
                "Profile '{}' has invalid request_timeout_secs (0). Resetting to {}.",
                profile.name, DEFAULT_REQUEST_TIMEOUT_SECS
            ));
            profile.request_timeout_secs = DEFAULT_REQUEST_TIMEOUT_SECS;
        }
    }

    (config, warnings)
}

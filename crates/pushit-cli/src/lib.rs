//! Command-line shell around `pushit-core`: profile storage plus the run trigger.

pub mod cli_args;

use cli_args::{
    Cli, Command, ProfileCommand, ProfileCreateArgs, ProfileSelector, ProfileUpdateArgs, RunArgs,
    SecretCommand, parse_optional_field,
};
use pushit_core::config::{
    self, FileConfig, ProfileDefinition, apply_run_overrides, load_profile_file, resolve_profile,
    stored_profile,
};
use pushit_core::runtime::{RunOptions, check_connection, run_definition};
use rpassword::prompt_password;
use tracing::{info, warn};

/// Execute a parsed command line. Errors are rendered for the operator and mean exit code 1.
pub async fn dispatch(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Run(args) => run(args).await,
        Command::Check(selector) => check(selector).await,
        Command::Profile(command) => handle_profile_command(command),
        Command::Secret(command) => handle_secret_command(command),
    }
}

fn load_with_warnings() -> config::ConfigLoadResult {
    let mut load = config::load_config();
    for warning in load.warnings.drain(..) {
        warn!("{warning}");
        eprintln!("Warning: {warning}");
    }
    load
}

fn load_store() -> FileConfig {
    load_with_warnings().config
}

/// Store for commands that save it back; refuses a file that exists but failed to load.
fn load_writable_store() -> Result<FileConfig, String> {
    load_with_warnings()
        .into_writable(&config::config_path())
        .map_err(|err| err.to_string())
}

fn select_profile(selector: &ProfileSelector) -> Result<ProfileDefinition, String> {
    match (&selector.profile, &selector.config) {
        (_, Some(path)) => load_profile_file(path)
            .map_err(|err| format!("Could not load profile file {}: {err}", path.display())),
        (Some(name), None) => stored_profile(&load_store(), name).map_err(|err| err.to_string()),
        (None, None) => Err("Choose a profile with --profile NAME or --config FILE.".into()),
    }
}

async fn run(args: RunArgs) -> Result<(), String> {
    let mut profile = select_profile(&args.selector)?;
    apply_run_overrides(&mut profile, &args.to_run_overrides());

    info!(profile = %profile.name, dry_run = args.dry_run, "Starting run");
    let options = RunOptions {
        dry_run: args.dry_run,
        quiet: args.quiet,
        ..RunOptions::default()
    };
    let result = run_definition(&profile, options)
        .await
        .map_err(|err| err.to_string())?;

    if args.quiet {
        println!("{}", result.summary_line());
    }
    Ok(())
}

async fn check(selector: ProfileSelector) -> Result<(), String> {
    let profile = select_profile(&selector)?;
    let config = resolve_profile(&profile).map_err(|err| err.to_string())?;
    let user = check_connection(&config)
        .await
        .map_err(|err| format!("Connection to {} failed: {err}", config.site_url))?;
    println!(
        "Connected to {} as {} (user id {}).",
        config.site_url, user.name, user.id
    );
    Ok(())
}

/// Build a new profile from `create` arguments and add it to the store.
pub fn create_profile(store: &mut FileConfig, args: &ProfileCreateArgs) -> Result<(), String> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err("Profile name must not be empty.".into());
    }
    if store.find_profile(name).is_some() {
        return Err(format!("Profile '{name}' already exists."));
    }

    let mut profile =
        ProfileDefinition::new(name, &args.site_url, &args.username, &args.content_dir);
    profile.category_ids = args.categories.clone();
    if let Some(status) = args.status {
        profile.post_status = status;
    }
    profile.featured_image = args.featured_image.as_deref().and_then(parse_optional_field);
    if let Some(ref day) = args.schedule_day {
        profile.schedule_day = day.clone();
    }
    if let Some(ref time) = args.schedule_time {
        profile.schedule_time = time.clone();
    }
    if let Some(ref timezone) = args.timezone {
        profile.timezone = timezone.clone();
    }
    if let Some(ref extension) = args.content_extension {
        profile.content_extension = extension.clone();
    }
    profile.require_seo_fields = args.require_seo_fields;
    if let Some(secs) = args.request_timeout_secs {
        profile.request_timeout_secs = secs;
    }

    validate_profile_shape(&profile)?;
    store.profiles.push(profile);
    store.profiles.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(())
}

/// Apply `update` arguments to an existing stored profile.
pub fn update_profile(store: &mut FileConfig, args: &ProfileUpdateArgs) -> Result<(), String> {
    let profile = store
        .find_profile_mut(&args.name)
        .ok_or_else(|| format!("Profile '{}' not found.", args.name))?;
    let mut updated = profile.clone();

    if let Some(ref url) = args.site_url {
        updated.site_url = url.clone();
    }
    if let Some(ref username) = args.username {
        updated.username = username.clone();
    }
    if let Some(ref dir) = args.content_dir {
        updated.content_dir = dir.clone();
    }
    if let Some(ref categories) = args.categories {
        updated.category_ids = categories.clone();
    }
    if let Some(status) = args.status {
        updated.post_status = status;
    }
    if let Some(ref image) = args.featured_image {
        updated.featured_image = parse_optional_field(image);
    }
    if let Some(ref day) = args.schedule_day {
        updated.schedule_day = day.clone();
    }
    if let Some(ref time) = args.schedule_time {
        updated.schedule_time = time.clone();
    }
    if let Some(ref timezone) = args.timezone {
        updated.timezone = timezone.clone();
    }
    if let Some(ref dir) = args.queue_dir {
        updated.queue_dir = parse_optional_field(dir);
    }
    if let Some(ref dir) = args.archive_dir {
        updated.archive_dir = parse_optional_field(dir);
    }
    if let Some(ref path) = args.manifest_path {
        updated.manifest_path = parse_optional_field(path);
    }
    if let Some(ref path) = args.run_log_path {
        updated.run_log_path = parse_optional_field(path);
    }
    if let Some(ref extension) = args.content_extension {
        updated.content_extension = extension.clone();
    }
    if let Some(require) = args.require_seo_fields {
        updated.require_seo_fields = require;
    }
    if let Some(secs) = args.request_timeout_secs {
        updated.request_timeout_secs = secs;
    }

    validate_profile_shape(&updated)?;
    *profile = updated;
    Ok(())
}

/// Remove a profile from the store, returning it so its secret can be cleared.
pub fn delete_profile(store: &mut FileConfig, name: &str) -> Result<ProfileDefinition, String> {
    let position = store
        .profiles
        .iter()
        .position(|profile| profile.name == name)
        .ok_or_else(|| format!("Profile '{name}' not found."))?;
    Ok(store.profiles.remove(position))
}

/// Insert or replace a profile by name.
pub fn import_profile(store: &mut FileConfig, profile: ProfileDefinition) -> Result<bool, String> {
    validate_profile_shape(&profile)?;
    let replaced = match store.find_profile_mut(&profile.name) {
        Some(existing) => {
            *existing = profile;
            true
        }
        None => {
            store.profiles.push(profile);
            store.profiles.sort_by(|a, b| a.name.cmp(&b.name));
            false
        }
    };
    Ok(replaced)
}

/// Checks everything `resolve_profile` would, except the password which may be set later.
fn validate_profile_shape(profile: &ProfileDefinition) -> Result<(), String> {
    let mut probe = profile.clone();
    probe.app_password = Some(config::SecretValue::Plain("probe".to_string()));
    probe.post_status = pushit_core::PostStatus::Schedule;
    resolve_profile(&probe)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

fn persist(store: &FileConfig) -> Result<(), String> {
    config::save_config(store).map_err(|err| err.to_string())
}

fn handle_profile_command(command: ProfileCommand) -> Result<(), String> {
    match command {
        ProfileCommand::Create(args) => {
            let mut store = load_writable_store()?;
            create_profile(&mut store, &args)?;
            if args.ask_password {
                let password = prompt_password(format!("Application password for '{}': ", args.name))
                    .map_err(|err| format!("Failed to read password: {err}"))?;
                if let Some(profile) = store.find_profile_mut(args.name.trim()) {
                    profile
                        .set_app_password(&password)
                        .map_err(|err| err.to_string())?;
                }
            }
            persist(&store)?;
            println!("Created profile '{}'", args.name.trim());
            if !args.ask_password {
                println!(
                    "Set its password with: pushit secret set-password --profile \"{}\"",
                    args.name.trim()
                );
            }
            Ok(())
        }
        ProfileCommand::Update(args) => {
            let mut store = load_writable_store()?;
            update_profile(&mut store, &args)?;
            persist(&store)?;
            println!("Updated profile '{}'", args.name);
            Ok(())
        }
        ProfileCommand::Delete(args) => {
            let mut store = load_writable_store()?;
            let mut removed = delete_profile(&mut store, &args.name)?;
            if let Err(err) = removed.clear_app_password() {
                warn!(profile = %args.name, error = %err, "Could not remove stored password");
            }
            persist(&store)?;
            println!("Deleted profile '{}'", args.name);
            Ok(())
        }
        ProfileCommand::List => list_profiles(&load_store()),
        ProfileCommand::Show(args) => {
            let profile = stored_profile(&load_store(), &args.name).map_err(|err| err.to_string())?;
            print!(
                "{}",
                profile.to_redacted_toml().map_err(|err| err.to_string())?
            );
            Ok(())
        }
        ProfileCommand::Import(args) => {
            let mut store = load_writable_store()?;
            let profile = load_profile_file(&args.file).map_err(|err| {
                format!("Could not load profile file {}: {err}", args.file.display())
            })?;
            let name = profile.name.clone();
            let replaced = import_profile(&mut store, profile)?;
            persist(&store)?;
            println!(
                "{} profile '{name}'",
                if replaced { "Replaced" } else { "Imported" }
            );
            Ok(())
        }
    }
}

fn list_profiles(store: &FileConfig) -> Result<(), String> {
    if store.profiles.is_empty() {
        println!("No profiles stored in {}.", config::config_path().display());
        return Ok(());
    }
    for profile in &store.profiles {
        println!(
            "{:<24} {:<9} {}{}",
            profile.name,
            profile.post_status,
            profile.site_url,
            if profile.has_app_password() {
                ""
            } else {
                "  (no password)"
            }
        );
    }
    Ok(())
}

fn handle_secret_command(command: SecretCommand) -> Result<(), String> {
    let mut store = load_writable_store()?;

    match command {
        SecretCommand::SetPassword { profile, password } => {
            let value = match password {
                Some(value) => value,
                None => prompt_password(format!("Application password for '{profile}': "))
                    .map_err(|err| format!("Failed to read password: {err}"))?,
            };
            if value.trim().is_empty() {
                return Err("Password must not be empty; use clear-password to remove it.".into());
            }
            store
                .find_profile_mut(&profile)
                .ok_or_else(|| format!("Profile '{profile}' not found."))?
                .set_app_password(&value)
                .map_err(|err| err.to_string())?;
            persist(&store)?;
            println!("Application password for '{profile}' saved securely.");
            Ok(())
        }
        SecretCommand::ClearPassword { profile } => {
            store
                .find_profile_mut(&profile)
                .ok_or_else(|| format!("Profile '{profile}' not found."))?
                .clear_app_password()
                .map_err(|err| err.to_string())?;
            persist(&store)?;
            println!("Cleared application password for '{profile}'.");
            Ok(())
        }
    }
}

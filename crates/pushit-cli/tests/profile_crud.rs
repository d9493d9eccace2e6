use clap::Parser;
use pushit_cli::cli_args::{Cli, Command, ProfileCommand, ProfileCreateArgs, ProfileUpdateArgs};
use pushit_cli::{create_profile, delete_profile, import_profile, update_profile};
use pushit_core::config::{FileConfig, PostStatus, ProfileDefinition};

fn create_args(extra: &[&str]) -> ProfileCreateArgs {
    let mut argv = vec![
        "pushit",
        "profile",
        "create",
        "--name",
        "Acme",
        "--site-url",
        "https://acme.example.com",
        "--username",
        "bot",
        "--content-dir",
        "/srv/acme",
    ];
    argv.extend_from_slice(extra);
    match Cli::try_parse_from(argv).unwrap().command {
        Command::Profile(ProfileCommand::Create(args)) => args,
        other => panic!("unexpected command {other:?}"),
    }
}

fn update_args(extra: &[&str]) -> ProfileUpdateArgs {
    let mut argv = vec!["pushit", "profile", "update", "--name", "Acme"];
    argv.extend_from_slice(extra);
    match Cli::try_parse_from(argv).unwrap().command {
        Command::Profile(ProfileCommand::Update(args)) => args,
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_create_applies_defaults_and_flags() {
    let mut store = FileConfig::default();
    create_profile(
        &mut store,
        &create_args(&["--status", "schedule", "--schedule-day", "Tuesday"]),
    )
    .unwrap();

    let profile = store.find_profile("Acme").expect("profile stored");
    assert_eq!(profile.post_status, PostStatus::Schedule);
    assert_eq!(profile.schedule_day, "Tuesday");
    assert_eq!(profile.schedule_time, "09:00");
    assert_eq!(profile.content_extension, "html");
    assert!(!profile.has_app_password());
}

#[test]
fn test_create_rejects_duplicates_and_invalid_fields() {
    let mut store = FileConfig::default();
    create_profile(&mut store, &create_args(&[])).unwrap();
    let err = create_profile(&mut store, &create_args(&[])).unwrap_err();
    assert!(err.contains("already exists"));

    let mut other = FileConfig::default();
    assert!(create_profile(&mut other, &create_args(&["--schedule-time", "25:99"])).is_err());
    assert!(other.profiles.is_empty());
}

#[test]
fn test_update_changes_only_given_fields() {
    let mut store = FileConfig::default();
    create_profile(&mut store, &create_args(&["--category", "1,2"])).unwrap();

    update_profile(
        &mut store,
        &update_args(&["--status", "publish", "--queue-dir", "/tmp/q", "--require-seo"]),
    )
    .unwrap();
    let profile = store.find_profile("Acme").unwrap();
    assert_eq!(profile.post_status, PostStatus::Publish);
    assert_eq!(profile.queue_dir.as_deref(), Some("/tmp/q"));
    assert!(profile.require_seo_fields);
    assert_eq!(profile.category_ids, vec![1, 2]);

    update_profile(&mut store, &update_args(&["--queue-dir", "none"])).unwrap();
    assert!(store.find_profile("Acme").unwrap().queue_dir.is_none());
}

#[test]
fn test_invalid_update_leaves_profile_untouched() {
    let mut store = FileConfig::default();
    create_profile(&mut store, &create_args(&[])).unwrap();
    let before = store.find_profile("Acme").cloned();

    assert!(update_profile(&mut store, &update_args(&["--site-url", "ftp://nope"])).is_err());
    assert_eq!(store.find_profile("Acme").cloned(), before);
}

#[test]
fn test_delete_and_import() {
    let mut store = FileConfig::default();
    create_profile(&mut store, &create_args(&[])).unwrap();
    let removed = delete_profile(&mut store, "Acme").unwrap();
    assert_eq!(removed.name, "Acme");
    assert!(delete_profile(&mut store, "Acme").is_err());

    let imported = ProfileDefinition::new("Beta", "https://beta.example.com", "ed", "/srv/beta");
    assert!(!import_profile(&mut store, imported.clone()).unwrap());
    assert!(import_profile(&mut store, imported).unwrap());
    assert_eq!(store.profiles.len(), 1);
}

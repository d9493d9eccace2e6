use std::path::PathBuf;

use clap::Parser;
use pushit_cli::cli_args::{Cli, Command, ProfileCommand, SecretCommand};
use pushit_core::config::PostStatus;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("pushit").chain(args.iter().copied()))
}

#[test]
fn test_run_with_profile_and_overrides() {
    let cli = parse(&[
        "run",
        "--profile",
        "acme",
        "--dry-run",
        "--status",
        "Schedule",
        "--queue",
        "/srv/q",
        "--featured-image",
        "none",
    ])
    .unwrap();

    let Command::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.selector.profile.as_deref(), Some("acme"));
    assert!(args.selector.config.is_none());
    assert!(args.dry_run);

    let overrides = args.to_run_overrides();
    assert_eq!(overrides.status, Some(PostStatus::Schedule));
    assert_eq!(overrides.queue_dir.as_deref(), Some("/srv/q"));
    assert_eq!(overrides.featured_image, Some(None));
    assert!(overrides.archive_dir.is_none());
}

#[test]
fn test_run_with_config_file() {
    let cli = parse(&["run", "--config", "profiles/acme.json"]).unwrap();
    let Command::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(
        args.selector.config,
        Some(PathBuf::from("profiles/acme.json"))
    );
    assert!(args.to_run_overrides().is_empty());
}

#[test]
fn test_run_requires_exactly_one_profile_source() {
    assert!(parse(&["run"]).is_err());
    assert!(parse(&["run", "--profile", "a", "--config", "b.json"]).is_err());
}

#[test]
fn test_run_rejects_unknown_status() {
    assert!(parse(&["run", "--profile", "a", "--status", "pending"]).is_err());
}

#[test]
fn test_check_accepts_selector() {
    let cli = parse(&["check", "--profile", "acme"]).unwrap();
    assert!(matches!(cli.command, Command::Check(ref s) if s.profile.as_deref() == Some("acme")));
}

#[test]
fn test_profile_create_collects_categories() {
    let cli = parse(&[
        "profile",
        "create",
        "--name",
        "Acme",
        "--site-url",
        "https://acme.example.com",
        "--username",
        "bot",
        "--content-dir",
        "~/content/acme",
        "--category",
        "3,7",
        "--category",
        "9",
        "--require-seo",
    ])
    .unwrap();

    let Command::Profile(ProfileCommand::Create(args)) = cli.command else {
        panic!("expected profile create");
    };
    assert_eq!(args.categories, vec![3, 7, 9]);
    assert!(args.require_seo_fields);
    assert!(args.status.is_none());
}

#[test]
fn test_profile_update_optional_bool() {
    let cli = parse(&["profile", "update", "--name", "Acme", "--require-seo", "false"]).unwrap();
    let Command::Profile(ProfileCommand::Update(args)) = cli.command else {
        panic!("expected profile update");
    };
    assert_eq!(args.require_seo_fields, Some(false));
    assert!(args.categories.is_none());

    let cli = parse(&["profile", "update", "--name", "Acme", "--require-seo"]).unwrap();
    let Command::Profile(ProfileCommand::Update(args)) = cli.command else {
        panic!("expected profile update");
    };
    assert_eq!(args.require_seo_fields, Some(true));
}

#[test]
fn test_profile_aliases() {
    assert!(matches!(
        parse(&["profile", "ls"]).unwrap().command,
        Command::Profile(ProfileCommand::List)
    ));
    assert!(matches!(
        parse(&["profile", "remove", "--name", "x"]).unwrap().command,
        Command::Profile(ProfileCommand::Delete(_))
    ));
}

#[test]
fn test_secret_commands() {
    let cli = parse(&["secret", "set-password", "--profile", "acme"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Secret(SecretCommand::SetPassword { ref profile, password: None }) if profile == "acme"
    ));
    assert!(parse(&["secret", "clear-password"]).is_err());
}

#[test]
fn test_verbose_counts_anywhere_on_the_line() {
    assert_eq!(parse(&["profile", "list"]).unwrap().verbose, 0);
    assert_eq!(parse(&["-v", "profile", "list"]).unwrap().verbose, 1);
    let cli = parse(&["run", "--profile", "acme", "-vv"]).unwrap();
    assert_eq!(cli.verbose, 2);
    assert!(matches!(cli.command, Command::Run(_)));
}

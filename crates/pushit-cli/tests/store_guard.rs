use std::fs;

use clap::Parser;
use pushit_cli::cli_args::Cli;
use pushit_cli::dispatch;
use tempfile::tempdir;

const NEWER_STORE: &str = r#"schema_version = 2

[[profiles]]
name = "clientA"
site_url = "https://a.example.com"
username = "bot"
content_dir = "/srv/a"
"#;

// Only test in this binary, so nothing else reads the environment concurrently.
#[tokio::test]
async fn test_commands_that_save_leave_an_unloadable_store_alone() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, NEWER_STORE).unwrap();
    unsafe { std::env::set_var("PUSHIT_CONFIG_DIR", temp.path()) };

    let commands: [&[&str]; 4] = [
        &[
            "pushit",
            "profile",
            "create",
            "--name",
            "clientB",
            "--site-url",
            "https://b.example.com",
            "--username",
            "bot",
            "--content-dir",
            "/srv/b",
        ],
        &["pushit", "profile", "delete", "--name", "clientA"],
        &[
            "pushit",
            "secret",
            "set-password",
            "--profile",
            "clientA",
            "--password",
            "abcd efgh",
        ],
        &["pushit", "secret", "clear-password", "--profile", "clientA"],
    ];

    for argv in commands {
        let cli = Cli::try_parse_from(argv).unwrap();
        let err = dispatch(cli).await.unwrap_err();
        assert!(err.contains("Refusing to overwrite"), "{argv:?}: {err}");
        assert_eq!(fs::read_to_string(&path).unwrap(), NEWER_STORE);
    }

    let garbled = "profiles = [[[";
    fs::write(&path, garbled).unwrap();
    let cli = Cli::try_parse_from(["pushit", "profile", "delete", "--name", "clientA"]).unwrap();
    assert!(dispatch(cli).await.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), garbled);
}

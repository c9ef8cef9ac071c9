//! Integration tests for configuration loading
//!
//! Reads real `KEY=VALUE` files and resolves them against a fake environment.

use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;
use totpick_core::config::env_file::{config_file_path, load_settings_from_path};
use totpick_core::config::{is_truthy, Config, GeneratorChoice, Overrides};

#[test]
fn test_full_config_file() {
    let dir = tempdir().unwrap();
    let path = config_file_path(dir.path());
    std::fs::write(
        &path,
        "\
GNUPGHOME=/home/me/.gnupg-totp
TOTP_FILE=/home/me/totp.json.gpg
TOTP_NO_ENCRYPTION=no
TOTP_AUTOPASTE=N
TOTP_AUTOPASTE_DELAY=0.5
TOTP_AUTOCLIPBOARD=Y
TOTP_GENERATOR=builtin
TOTP_CACHE_LIMIT=4
",
    )
    .unwrap();

    let settings = load_settings_from_path(&path).unwrap();
    let config = Config::resolve(
        dir.path().to_path_buf(),
        |_| None,
        &settings,
        &Overrides::default(),
    )
    .unwrap();

    assert_eq!(config.gnupg_home, Some(PathBuf::from("/home/me/.gnupg-totp")));
    assert_eq!(config.store_path, PathBuf::from("/home/me/totp.json.gpg"));
    assert!(config.encryption);
    assert!(!config.autopaste);
    assert!(config.autoclipboard);
    assert_eq!(config.autopaste_delay, Duration::from_millis(500));
    assert_eq!(config.generator, GeneratorChoice::Builtin);
    assert_eq!(config.cache_limit, 4);
}

#[test]
fn test_environment_fills_gaps_left_by_file() {
    let dir = tempdir().unwrap();
    let path = config_file_path(dir.path());
    std::fs::write(&path, "TOTP_AUTOCLIPBOARD=yes\n").unwrap();

    let settings = load_settings_from_path(&path).unwrap();
    let environment = |key: &str| match key {
        "TOTP_NO_ENCRYPTION" => Some("1".to_string()),
        "TOTP_AUTOCLIPBOARD" => Some("no".to_string()),
        _ => None,
    };
    let config = Config::resolve(
        dir.path().to_path_buf(),
        environment,
        &settings,
        &Overrides::default(),
    )
    .unwrap();

    assert!(!config.encryption);
    assert!(config.autoclipboard);
    assert_eq!(config.store_path, dir.path().join("secrets.json.gpg"));
}

#[test]
fn test_truthy_table() {
    let cases = [
        ("y", true),
        ("Y", true),
        ("yes", true),
        ("YeS", true),
        ("1", true),
        ("", false),
        ("0", false),
        ("no", false),
        ("n", false),
        ("true", false),
        ("enabled", false),
    ];

    for (value, expected) in cases {
        assert_eq!(is_truthy(value), expected, "is_truthy({value:?})");
    }
}

//! Code generation from store entries

use std::fs;
use tempfile::tempdir;
use totpick_core::error::OtpError;
use totpick_core::otp::{builtin_code, oathtool_args, Generator};
use totpick_core::store::{Decryption, SecretStore};

const STORE: &str = r#"{
    "example": {"secret": "P8AKZ4RBH81ROVBH", "digits": 6, "period": 30, "issuer": "Example"},
    "valid": {"secret": "JBSW Y3DP EHPK 3PXP", "digits": 6, "period": 30, "issuer": "Valid"}
}"#;

fn open_store() -> totpick_core::store::DecryptedStore {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    fs::write(&path, STORE).unwrap();
    SecretStore::new(path, Decryption::Disabled).open().unwrap()
}

#[test]
fn test_oathtool_receives_entry_parameters() {
    let entry = open_store().entry("example").unwrap();
    let args = oathtool_args(&entry);

    assert!(args.contains(&"--digits=6".to_string()));
    assert!(args.contains(&"--time-step-size=30s".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("P8AKZ4RBH81ROVBH"));
}

#[test]
fn test_builtin_rejects_non_base32_secret() {
    let entry = open_store().entry("example").unwrap();
    assert_eq!(
        Generator::Builtin.generate(&entry).unwrap_err(),
        OtpError::InvalidBase32
    );
}

#[test]
fn test_builtin_code_from_store_entry() {
    let entry = open_store().entry("valid").unwrap();
    let token = Generator::Builtin.generate(&entry).unwrap();

    assert_eq!(token.expose().len(), 6);
    assert!(token.expose().chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_same_window_same_code() {
    let entry = open_store().entry("valid").unwrap();
    assert_eq!(
        builtin_code(&entry, 1_700_000_010).unwrap(),
        builtin_code(&entry, 1_700_000_019).unwrap()
    );
}

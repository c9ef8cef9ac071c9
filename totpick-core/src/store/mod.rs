//! Secret store access
//!
//! The store is a JSON object mapping entry names to
//! `{secret, digits, period, issuer}` records, normally encrypted with gpg.
//! This module locates it, decrypts it and parses it.

use crate::config::Config;
use crate::error::StoreError;
use crate::process::run_tool;
use crate::types::{Entry, OtpSecret};
use secrecy::{ExposeSecret, SecretVec};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

pub mod cache;

pub use cache::NameCache;

/// Default number of digits when an entry omits `digits`
pub const DEFAULT_DIGITS: u32 = 6;

/// Default time step when an entry omits `period`
pub const DEFAULT_PERIOD: u64 = 30;

/// How the store bytes are turned into JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decryption {
    /// Run `gpg --decrypt`, with GNUPGHOME pointed at `home` when set
    Gpg { home: Option<PathBuf> },
    /// The store is plaintext JSON
    Disabled,
}

/// Handle to the secret store file
#[derive(Debug, Clone)]
pub struct SecretStore {
    path: PathBuf,
    decryption: Decryption,
}

impl SecretStore {
    pub fn new(path: PathBuf, decryption: Decryption) -> Self {
        Self { path, decryption }
    }

    pub fn from_config(config: &Config) -> Self {
        let decryption = if config.encryption {
            Decryption::Gpg {
                home: config.gnupg_home.clone(),
            }
        } else {
            Decryption::Disabled
        };
        Self::new(config.store_path.clone(), decryption)
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Fail with [`StoreError::NotFound`] unless the store file exists
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.exists() {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                path: self.path.clone(),
            })
        }
    }

    /// Read the raw (still encrypted) store bytes
    pub fn read_raw(&self) -> Result<Vec<u8>, StoreError> {
        std::fs::read(&self.path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound {
                path: self.path.clone(),
            },
            _ => StoreError::Read {
                path: self.path.clone(),
                source,
            },
        })
    }

    /// Decrypt raw store bytes
    ///
    /// With encryption disabled the bytes pass through unchanged. Otherwise
    /// they are piped through gpg; a gpg failure carries its stderr and exit
    /// code unchanged.
    pub fn decrypt(&self, raw: &[u8]) -> Result<SecretVec<u8>, StoreError> {
        let home = match &self.decryption {
            Decryption::Disabled => return Ok(SecretVec::new(raw.to_vec())),
            Decryption::Gpg { home } => home,
        };

        let mut command = Command::new("gpg");
        command.args(["--quiet", "--decrypt"]);
        if let Some(home) = home {
            command.env("GNUPGHOME", home);
        }

        debug!("Decrypting {} with gpg", self.path.display());
        let output = run_tool(&mut command, Some(raw), false).map_err(|source| StoreError::Spawn {
            tool: "gpg".to_string(),
            source,
        })?;

        if !output.success() {
            return Err(StoreError::Decrypt {
                code: output.code(),
                message: output.diagnostic("gpg"),
            });
        }

        Ok(SecretVec::new(output.stdout))
    }

    /// Read, decrypt and parse the store
    pub fn open(&self) -> Result<DecryptedStore, StoreError> {
        let raw = self.read_raw()?;
        self.open_raw(&raw)
    }

    /// Decrypt and parse already-read store bytes
    pub fn open_raw(&self, raw: &[u8]) -> Result<DecryptedStore, StoreError> {
        let plain = self.decrypt(raw)?;
        DecryptedStore::parse(plain.expose_secret())
    }
}

#[derive(Deserialize)]
struct RawEntry {
    secret: String,
    #[serde(default = "default_digits")]
    digits: u32,
    #[serde(default = "default_period")]
    period: u64,
    #[serde(default)]
    issuer: Option<String>,
}

fn default_digits() -> u32 {
    DEFAULT_DIGITS
}

fn default_period() -> u64 {
    DEFAULT_PERIOD
}

/// Parsed contents of the store
///
/// Deliberately not `Debug`: it holds every secret in the store.
pub struct DecryptedStore {
    entries: Map<String, Value>,
}

impl DecryptedStore {
    /// Parse decrypted JSON; the top level must be an object
    pub fn parse(bytes: &[u8]) -> Result<Self, StoreError> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(entries) => Ok(Self { entries }),
            _ => Err(StoreError::NotAnObject),
        }
    }

    /// Entry names in the order they appear in the file
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Look up one entry by its exact name
    pub fn entry(&self, name: &str) -> Result<Entry, StoreError> {
        let value = self
            .entries
            .get(name)
            .ok_or_else(|| StoreError::EntryNotFound {
                name: name.to_string(),
            })?;

        let raw = RawEntry::deserialize(value).map_err(|e| StoreError::InvalidEntry {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        if raw.secret.trim().is_empty() {
            return Err(StoreError::InvalidEntry {
                name: name.to_string(),
                reason: "secret is empty".to_string(),
            });
        }

        Ok(Entry {
            name: name.to_string(),
            secret: OtpSecret::new(raw.secret),
            digits: raw.digits,
            period: raw.period,
            issuer: raw.issuer,
        })
    }
}

//! Configuration module
//!
//! Resolves the immutable runtime [`Config`] from built-in defaults, the
//! process environment, the `KEY=VALUE` config file and command-line
//! overrides, in that order of precedence.

use crate::error::ConfigError;
use crate::types::env;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub mod env_file;

/// Raw `KEY=VALUE` settings read from the config file
pub type Settings = BTreeMap<String, String>;

/// Default autopaste delay in seconds
pub const DEFAULT_AUTOPASTE_DELAY: f64 = 0.1;

/// Default number of name cache files kept around
pub const DEFAULT_CACHE_LIMIT: usize = 16;

/// Default store file name inside the config directory
pub const DEFAULT_STORE_FILE: &str = "secrets.json.gpg";

/// Which TOTP generator to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorChoice {
    /// `oathtool` when it is on PATH, the built-in generator otherwise
    #[default]
    Auto,
    Oathtool,
    Builtin,
}

impl FromStr for GeneratorChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "oathtool" => Ok(Self::Oathtool),
            "builtin" => Ok(Self::Builtin),
            _ => Err(ConfigError::InvalidValue {
                key: env::GENERATOR.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Runtime configuration, resolved once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the config file and the default store
    pub config_dir: PathBuf,

    /// Encryption directory handed to gpg as GNUPGHOME
    pub gnupg_home: Option<PathBuf>,

    /// Path to the (normally encrypted) secret store
    pub store_path: PathBuf,

    /// Whether the store must be decrypted with gpg
    pub encryption: bool,

    /// Type the code into the focused window
    pub autopaste: bool,

    /// Pause between typing the code and pressing Enter
    pub autopaste_delay: Duration,

    /// Copy the code to the clipboard
    pub autoclipboard: bool,

    pub generator: GeneratorChoice,

    /// Directory holding name cache files
    pub cache_dir: PathBuf,

    /// Maximum number of name cache files kept
    pub cache_limit: usize,
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub store_path: Option<PathBuf>,
    pub no_encryption: bool,
    pub autopaste: Option<bool>,
    pub autoclipboard: Option<bool>,
    pub autopaste_delay: Option<Duration>,
    pub generator: Option<GeneratorChoice>,
}

/// Parse a boolean-like option value
///
/// `y`, `yes` and `1` are true regardless of case. An empty value is
/// reported as [`ConfigError::EmptyFlag`] so callers can tell "unset" apart
/// from "false"; every other token is false.
pub fn parse_flag(value: &str) -> Result<bool, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::EmptyFlag);
    }

    Ok(matches!(
        value.to_ascii_lowercase().as_str(),
        "y" | "yes" | "1"
    ))
}

/// Truthy check where an empty value counts as false
pub fn is_truthy(value: &str) -> bool {
    parse_flag(value).unwrap_or(false)
}

/// Parse a delay given in (possibly fractional) seconds
pub fn parse_delay(value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: env::AUTOPASTE_DELAY.to_string(),
        value: value.to_string(),
    };

    let secs: f64 = value.trim().parse().map_err(|_| invalid())?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(invalid());
    }
    Ok(Duration::from_secs_f64(secs))
}

impl Config {
    /// Resolve the configuration from its layers
    ///
    /// `environment` looks up process environment variables; `file` holds the
    /// settings read from the config file, which win over the environment.
    /// Empty values are treated as unset and fall back to the defaults.
    pub fn resolve<E>(
        config_dir: PathBuf,
        environment: E,
        file: &Settings,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| -> Option<String> {
            file.get(key)
                .cloned()
                .or_else(|| environment(key))
                .filter(|v| !v.trim().is_empty())
        };
        let flag = |key: &str, default: bool| -> bool {
            lookup(key).map_or(default, |v| is_truthy(&v))
        };

        let gnupg_home = lookup(env::GNUPGHOME).map(PathBuf::from);

        let store_path = match &overrides.store_path {
            Some(path) => path.clone(),
            None => lookup(env::FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| config_dir.join(DEFAULT_STORE_FILE)),
        };

        let encryption = !(overrides.no_encryption || flag(env::NO_ENCRYPTION, false));

        let autopaste = overrides
            .autopaste
            .unwrap_or_else(|| flag(env::AUTOPASTE, true));
        let autoclipboard = overrides
            .autoclipboard
            .unwrap_or_else(|| flag(env::AUTOCLIPBOARD, false));

        let autopaste_delay = match overrides.autopaste_delay {
            Some(delay) => delay,
            None => match lookup(env::AUTOPASTE_DELAY) {
                Some(v) => parse_delay(&v)?,
                None => Duration::from_secs_f64(DEFAULT_AUTOPASTE_DELAY),
            },
        };

        let generator = match overrides.generator {
            Some(choice) => choice,
            None => match lookup(env::GENERATOR) {
                Some(v) => v.parse()?,
                None => GeneratorChoice::default(),
            },
        };

        let cache_limit = match lookup(env::CACHE_LIMIT) {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: env::CACHE_LIMIT.to_string(),
                    value: v.clone(),
                })?,
            None => DEFAULT_CACHE_LIMIT,
        };

        let cache_dir = environment(env::CACHE_DIR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_cache_dir);

        Ok(Self {
            config_dir,
            gnupg_home,
            store_path,
            encryption,
            autopaste,
            autopaste_delay,
            autoclipboard,
            generator,
            cache_dir,
            cache_limit,
        })
    }
}

/// Per-user directory under the system temp dir
fn default_cache_dir() -> PathBuf {
    let uid = nix::unistd::getuid();
    std::env::temp_dir().join(format!("totpick-{}", uid.as_raw()))
}

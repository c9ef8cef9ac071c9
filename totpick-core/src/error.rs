//! Error types for the totpick CLI tool
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the totpick application
#[derive(Error, Debug)]
pub enum TotpickError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to reading, decrypting or parsing the secret store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Errors related to OTP/TOTP operations
    #[error("OTP error: {0}")]
    Otp(#[from] OtpError),

    /// Errors related to choosing an entry
    #[error(transparent)]
    Select(#[from] SelectError),

    /// Errors related to delivering the code
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TotpickError {
    /// Process exit code for this error
    ///
    /// External tools that failed with a status code hand that code through
    /// unchanged; configuration problems exit with 2, everything else with 1.
    /// A config directory that cannot be created is a filesystem failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            TotpickError::Config(ConfigError::IoError { .. }) => 1,
            TotpickError::Config(_) => 2,
            TotpickError::Store(StoreError::Decrypt { code, .. }) => code.unwrap_or(1),
            TotpickError::Otp(OtpError::Generator { code, .. }) => code.unwrap_or(1),
            TotpickError::Select(SelectError::Picker { code }) => code.unwrap_or(1),
            _ => 1,
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Flag value is empty")]
    EmptyFlag,

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to load configuration file {path}: {message}")]
    LoadFailed { path: String, message: String },

    #[error("Cannot determine configuration directory: {message}")]
    NoConfigDir { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Secret store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("secret file {} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Decrypt { code: Option<i32>, message: String },

    #[error("secret file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("secret file must contain a JSON object at the top level")]
    NotAnObject,

    #[error("no entry named {name:?}")]
    EntryNotFound { name: String },

    #[error("entry {name:?} is malformed: {reason}")]
    InvalidEntry { name: String, reason: String },

    #[error("name cache error: {message}")]
    Cache { message: String },
}

/// OTP/TOTP operation errors
#[derive(Error, Debug, PartialEq)]
pub enum OtpError {
    #[error("Invalid Base32 secret")]
    InvalidBase32,

    #[error("Unsupported digit count: {0}")]
    InvalidDigits(u32),

    #[error("Period must be greater than zero")]
    InvalidPeriod,

    #[error("System time error")]
    TimeError,

    #[error("Failed to run {tool}: {message}")]
    Spawn { tool: String, message: String },

    #[error("{message}")]
    Generator { code: Option<i32>, message: String },

    #[error("Generator printed an unexpected code: {output:?}")]
    MalformedCode { output: String },
}

/// Entry selection errors
#[derive(Error, Debug, PartialEq)]
pub enum SelectError {
    #[error("name is empty!")]
    EmptyName,

    #[error("selection cancelled")]
    Picker { code: Option<i32> },

    #[error("failed to run {tool}: {message}")]
    Spawn { tool: String, message: String },
}

/// Code delivery errors
#[derive(Error, Debug, PartialEq)]
pub enum OutputError {
    #[error("failed to run {tool}: {message}")]
    Spawn { tool: String, message: String },

    #[error("{tool} exited with status {code:?}: {message}")]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        message: String,
    },

    #[error("failed to write code: {message}")]
    Write { message: String },

    #[error("code delivery failed: {}", .0.join("; "))]
    Delivery(Vec<String>),

    #[error("failed to detach: {message}")]
    Detach { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_message() {
        let err = TotpickError::from(SelectError::EmptyName);
        assert_eq!(err.to_string(), "name is empty!");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_exit_codes() {
        let err = TotpickError::from(ConfigError::InvalidValue {
            key: "TOTP_CACHE_LIMIT".to_string(),
            value: "many".to_string(),
        });
        assert_eq!(err.exit_code(), 2);

        let err = TotpickError::from(ConfigError::IoError {
            message: "Failed to create config directory".to_string(),
        });
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_external_exit_codes_propagate() {
        let err = TotpickError::from(StoreError::Decrypt {
            code: Some(2),
            message: "gpg: decryption failed: No secret key".to_string(),
        });
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "gpg: decryption failed: No secret key");

        let err = TotpickError::from(OtpError::Generator {
            code: None,
            message: "killed".to_string(),
        });
        assert_eq!(err.exit_code(), 1);

        let err = TotpickError::from(SelectError::Picker { code: Some(130) });
        assert_eq!(err.exit_code(), 130);
    }

    #[test]
    fn test_config_errors_exit_two() {
        let err = TotpickError::from(ConfigError::InvalidValue {
            key: "TOTP_AUTOPASTE_DELAY".to_string(),
            value: "soon".to_string(),
        });
        assert_eq!(err.exit_code(), 2);
    }
}

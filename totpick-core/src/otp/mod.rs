//! TOTP code generation
//!
//! Codes come from `oathtool` when it is installed, or from the built-in
//! RFC 6238 implementation (HMAC-SHA1 via totp-lite) otherwise. Either way
//! the result is checked to be exactly `digits` ASCII digits.

use crate::config::GeneratorChoice;
use crate::error::OtpError;
use crate::process::run_tool;
use crate::types::{Entry, TotpToken};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use totp_lite::Sha1;
use tracing::debug;

pub mod base32;

/// Name of the external generator binary
pub const OATHTOOL: &str = "oathtool";

/// Largest code length either backend supports
const MAX_DIGITS: u32 = 10;

/// A concrete TOTP backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Oathtool,
    Builtin,
}

impl Generator {
    /// Resolve the configured choice, probing PATH for `auto`
    pub fn resolve(choice: GeneratorChoice) -> Self {
        match choice {
            GeneratorChoice::Oathtool => Self::Oathtool,
            GeneratorChoice::Builtin => Self::Builtin,
            GeneratorChoice::Auto => {
                if which::which(OATHTOOL).is_ok() {
                    Self::Oathtool
                } else {
                    debug!("{} not found on PATH, using built-in TOTP", OATHTOOL);
                    Self::Builtin
                }
            }
        }
    }

    /// Generate the current code for `entry`
    pub fn generate(&self, entry: &Entry) -> Result<TotpToken, OtpError> {
        validate_parameters(entry)?;
        let code = match self {
            Self::Oathtool => run_oathtool(entry)?,
            Self::Builtin => builtin_code(entry, now()?)?,
        };
        validate_code(code, entry.digits)
    }
}

fn now() -> Result<u64, OtpError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| OtpError::TimeError)
}

fn validate_parameters(entry: &Entry) -> Result<(), OtpError> {
    if entry.digits == 0 || entry.digits > MAX_DIGITS {
        return Err(OtpError::InvalidDigits(entry.digits));
    }
    if entry.period == 0 {
        return Err(OtpError::InvalidPeriod);
    }
    Ok(())
}

/// Arguments passed to oathtool for `entry`, SHA-1 TOTP in Base32 mode
pub fn oathtool_args(entry: &Entry) -> Vec<String> {
    vec![
        "--base32".to_string(),
        "--totp=SHA1".to_string(),
        format!("--digits={}", entry.digits),
        format!("--time-step-size={}s", entry.period),
        entry.secret.expose().to_string(),
    ]
}

fn run_oathtool(entry: &Entry) -> Result<String, OtpError> {
    let output = run_tool(Command::new(OATHTOOL).args(oathtool_args(entry)), None, false)
        .map_err(|e| OtpError::Spawn {
            tool: OATHTOOL.to_string(),
            message: e.to_string(),
        })?;

    if !output.success() {
        return Err(OtpError::Generator {
            code: output.code(),
            message: output.diagnostic(OATHTOOL),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Built-in TOTP for `entry` at `timestamp` (seconds since the epoch)
pub fn builtin_code(entry: &Entry, timestamp: u64) -> Result<String, OtpError> {
    validate_parameters(entry)?;
    let key = base32::decode_base32(entry.secret.expose())?;
    Ok(totp_lite::totp_custom::<Sha1>(
        entry.period,
        entry.digits,
        &key,
        timestamp,
    ))
}

fn validate_code(code: String, digits: u32) -> Result<TotpToken, OtpError> {
    if code.len() == digits as usize && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(TotpToken::new(code))
    } else {
        Err(OtpError::MalformedCode { output: code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OtpSecret;

    fn entry(secret: &str, digits: u32, period: u64) -> Entry {
        Entry {
            name: "test".to_string(),
            secret: OtpSecret::new(secret.to_string()),
            digits,
            period,
            issuer: None,
        }
    }

    #[test]
    fn test_oathtool_args_carry_entry_parameters() {
        let args = oathtool_args(&entry("P8AKZ4RBH81ROVBH", 6, 30));
        assert_eq!(
            args,
            vec![
                "--base32",
                "--totp=SHA1",
                "--digits=6",
                "--time-step-size=30s",
                "P8AKZ4RBH81ROVBH",
            ]
        );
    }

    #[test]
    fn test_builtin_rfc6238_vectors() {
        // RFC 6238 appendix B, SHA-1 seed "12345678901234567890"
        let seed = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";
        let e = entry(seed, 8, 30);
        assert_eq!(builtin_code(&e, 59).unwrap(), "94287082");
        assert_eq!(builtin_code(&e, 1111111109).unwrap(), "07081804");
        assert_eq!(builtin_code(&e, 1234567890).unwrap(), "89005924");
        assert_eq!(builtin_code(&e, 20000000000).unwrap(), "65353130");
    }

    #[test]
    fn test_builtin_six_digits() {
        let token = Generator::Builtin
            .generate(&entry("JBSWY3DPEHPK3PXP", 6, 30))
            .unwrap();
        assert_eq!(token.expose().len(), 6);
        assert!(token.expose().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_period_changes_window() {
        let e30 = entry("JBSWY3DPEHPK3PXP", 6, 30);
        let e60 = entry("JBSWY3DPEHPK3PXP", 6, 60);
        // 30s and 60s windows agree at t=0 and diverge once counters differ
        assert_eq!(builtin_code(&e30, 0).unwrap(), builtin_code(&e60, 0).unwrap());
        assert_eq!(builtin_code(&e60, 0).unwrap(), builtin_code(&e60, 59).unwrap());
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            Generator::Builtin.generate(&entry("JBSWY3DPEHPK3PXP", 0, 30)).unwrap_err(),
            OtpError::InvalidDigits(0)
        );
        assert_eq!(
            Generator::Builtin.generate(&entry("JBSWY3DPEHPK3PXP", 6, 0)).unwrap_err(),
            OtpError::InvalidPeriod
        );
        assert_eq!(
            Generator::Builtin.generate(&entry("P8AKZ4RBH81ROVBH", 6, 30)).unwrap_err(),
            OtpError::InvalidBase32
        );
    }

    #[test]
    fn test_validate_code() {
        assert!(validate_code("123456".to_string(), 6).is_ok());
        assert!(validate_code("12345".to_string(), 6).is_err());
        assert!(validate_code("12a456".to_string(), 6).is_err());
    }

    #[test]
    fn test_explicit_choices_resolve_directly() {
        assert_eq!(Generator::resolve(GeneratorChoice::Builtin), Generator::Builtin);
        assert_eq!(Generator::resolve(GeneratorChoice::Oathtool), Generator::Oathtool);
    }
}

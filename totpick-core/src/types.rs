//! Type definitions and wrappers for secure data handling
//!
//! This module provides type-safe wrappers for sensitive data using the
//! secrecy crate to prevent accidental exposure in logs or debug output.

use secrecy::{ExposeSecret, Secret};

/// Wrapper for a Base32-encoded TOTP shared secret
///
/// Secrets read from the store never show up in debug output.
#[derive(Clone, Debug)]
pub struct OtpSecret(Secret<String>);

impl OtpSecret {
    /// Create a new OtpSecret from a Base32-encoded string
    pub fn new(secret: String) -> Self {
        Self(Secret::new(secret))
    }

    /// Expose the secret value (use with caution!)
    ///
    /// This should only be called when handing the secret to the generator.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Wrapper for generated TOTP tokens
///
/// Generated OTP tokens should also be treated as sensitive data
/// and never logged, even though they have a short lifetime.
#[derive(Clone, Debug)]
pub struct TotpToken(Secret<String>);

impl TotpToken {
    /// Create a new TotpToken from a generated token string
    pub fn new(token: String) -> Self {
        Self(Secret::new(token))
    }

    /// Expose the token value (use with caution!)
    ///
    /// This should only be called when delivering the token to stdout,
    /// the clipboard or the input simulator.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// One record of the secret store
#[derive(Clone, Debug)]
pub struct Entry {
    pub name: String,
    pub secret: OtpSecret,
    pub digits: u32,
    /// Time step in seconds
    pub period: u64,
    pub issuer: Option<String>,
}

/// Environment variable names
pub mod env {
    pub const CONFIG_DIR: &str = "TOTPICK_CONFIG_DIR";
    pub const CACHE_DIR: &str = "TOTPICK_CACHE_DIR";
    pub const GNUPGHOME: &str = "GNUPGHOME";
    pub const FILE: &str = "TOTP_FILE";
    pub const NO_ENCRYPTION: &str = "TOTP_NO_ENCRYPTION";
    pub const AUTOPASTE: &str = "TOTP_AUTOPASTE";
    pub const AUTOPASTE_DELAY: &str = "TOTP_AUTOPASTE_DELAY";
    pub const AUTOCLIPBOARD: &str = "TOTP_AUTOCLIPBOARD";
    pub const GENERATOR: &str = "TOTP_GENERATOR";
    pub const CACHE_LIMIT: &str = "TOTP_CACHE_LIMIT";

    /// Set by rofi when running a script mode
    pub const LAUNCHER: &str = "ROFI_RETV";
    /// Set in the detached child so it never re-enters launcher mode
    pub const LAUNCHER_GUARD: &str = "TOTPICK_LAUNCHER_CHILD";

    pub const WAYLAND_DISPLAY: &str = "WAYLAND_DISPLAY";
    pub const DISPLAY: &str = "DISPLAY";

    /// Every key that may appear in the config file
    pub const CONFIG_KEYS: &[&str] = &[
        GNUPGHOME,
        FILE,
        NO_ENCRYPTION,
        AUTOPASTE,
        AUTOPASTE_DELAY,
        AUTOCLIPBOARD,
        GENERATOR,
        CACHE_LIMIT,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secrets() {
        let secret = OtpSecret::new("JBSWY3DPEHPK3PXP".to_string());
        let token = TotpToken::new("123456".to_string());

        assert!(!format!("{:?}", secret).contains("JBSWY3DPEHPK3PXP"));
        assert!(!format!("{:?}", token).contains("123456"));
        assert_eq!(token.expose(), "123456");
    }
}

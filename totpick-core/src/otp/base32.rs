//! Lenient Base32 decoding for stored secrets
//!
//! Secrets copied from provider setup pages often come grouped with spaces,
//! in lower case and without padding. Decoding therefore:
//! 1. removes all whitespace
//! 2. pads to an 8-character boundary
//! 3. decodes case-insensitively

use crate::error::OtpError;
use data_encoding::BASE32;

fn clean(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Formula: padding_length = (8 - (len % 8)) % 8
fn pad(input: &str) -> String {
    let padding_len = (8 - (input.len() % 8)) % 8;
    format!("{}{}", input, "=".repeat(padding_len))
}

/// Decode a Base32 secret to key bytes
pub fn decode_base32(input: &str) -> Result<Vec<u8>, OtpError> {
    let cleaned = clean(input).trim_end_matches('=').to_uppercase();
    if cleaned.is_empty() {
        return Err(OtpError::InvalidBase32);
    }

    BASE32
        .decode(pad(&cleaned).as_bytes())
        .map_err(|_| OtpError::InvalidBase32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_whitespace() {
        assert_eq!(clean("JBSW Y3DP\tEHPK 3PXP\n"), "JBSWY3DPEHPK3PXP");
    }

    #[test]
    fn test_pad_formula() {
        assert_eq!(pad("JBSWY3DPEHPK3PXP"), "JBSWY3DPEHPK3PXP");
        assert_eq!(pad("JBSWY3DPEHPK3P"), "JBSWY3DPEHPK3P==");
        for len in 1..=8 {
            assert_eq!(pad(&"A".repeat(len)).len(), 8);
        }
    }

    #[test]
    fn test_decode_known_value() {
        assert_eq!(decode_base32("JBSWY3DPEHPK3PXP").unwrap(), b"Hello!\xde\xad\xbe\xef");
    }

    #[test]
    fn test_decode_is_lenient() {
        let expected = decode_base32("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(decode_base32("jbsw y3dp ehpk 3pxp").unwrap(), expected);
        assert_eq!(decode_base32("JbSwY3DpEhPk3PxP").unwrap(), expected);
    }

    #[test]
    fn test_decode_unpadded_and_padded_agree() {
        assert_eq!(decode_base32("MZXW6").unwrap(), b"foo");
        assert_eq!(decode_base32("mzxw6===").unwrap(), b"foo");
    }

    #[test]
    fn test_decode_invalid() {
        // 8 and 1 are outside the RFC 4648 alphabet
        assert_eq!(decode_base32("P8AKZ4RBH81ROVBH"), Err(OtpError::InvalidBase32));
        assert_eq!(decode_base32("INVALID@CHARS!"), Err(OtpError::InvalidBase32));
        assert_eq!(decode_base32("   "), Err(OtpError::InvalidBase32));
    }
}

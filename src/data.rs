//! Plain-text rendering of cipher values.
//!
//! A ciphertext is written as one line of space-separated decimal integers,
//! one per plaintext byte.  The format carries no framing or checksum; the
//! decryptor's range and residue checks catch values that were altered.

use crate::error::DecodeError;

/// Renders cipher values as a single space-separated line.
pub fn format_cipher_values(values: &[u64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a line produced by [`format_cipher_values`].
///
/// Any run of whitespace separates values; blank input is an empty
/// ciphertext.  The first token that is not a `u64` fails the whole parse.
pub fn parse_cipher_values(input: &str) -> Result<Vec<u64>, DecodeError> {
    input
        .split_whitespace()
        .enumerate()
        .map(|(index, tok)| {
            tok.parse::<u64>().map_err(|_| DecodeError::MalformedToken {
                index,
                token: tok.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cipher_values() {
        assert_eq!(format_cipher_values(&[318, 0, 1555]), "318 0 1555");
        assert_eq!(format_cipher_values(&[]), "");
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        assert_eq!(
            parse_cipher_values("  318 0\t1555 \n").unwrap(),
            vec![318, 0, 1555]
        );
        assert!(parse_cipher_values("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_token() {
        assert_eq!(
            parse_cipher_values("318 -4 12"),
            Err(DecodeError::MalformedToken {
                index: 1,
                token: "-4".to_string()
            })
        );
        assert!(parse_cipher_values("318 x").is_err());
    }
}

//! Byte-to-bit conversion, most significant bit first.
//!
//! Each byte expands to exactly eight bits; bit `j` of a byte's group is the
//! coefficient of `2^(7 - j)`.  The same ordering selects public key element
//! `j` during encryption, so the layout here fixes which key element each
//! bit of the plaintext controls.

use crate::error::DecodeError;

/// Number of bits carried by one byte, and by one cipher value.
pub const BITS_PER_BYTE: usize = 8;

/// Expands a byte into its eight bits, MSB first.
#[inline]
pub fn byte_to_bits(byte: u8) -> [bool; BITS_PER_BYTE] {
    let mut bits = [false; BITS_PER_BYTE];
    for (j, bit) in bits.iter_mut().enumerate() {
        *bit = (byte >> (BITS_PER_BYTE - 1 - j)) & 1 == 1;
    }
    bits
}

/// Packs eight MSB-first bits back into a byte.
#[inline]
pub fn bits_to_byte(bits: &[bool; BITS_PER_BYTE]) -> u8 {
    bits.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8)
}

/// Converts text into a bit sequence of length `8 * text.len()`.
pub fn text_to_bits(text: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(text.len() * BITS_PER_BYTE);
    for &byte in text {
        bits.extend_from_slice(&byte_to_bits(byte));
    }
    bits
}

/// Reassembles bytes from groups of eight MSB-first bits.
///
/// Fails with [`DecodeError::BitLength`] unless `bits.len()` is a multiple
/// of eight; a trailing partial byte is never dropped silently.
pub fn bits_to_text(bits: &[bool]) -> Result<Vec<u8>, DecodeError> {
    if bits.len() % BITS_PER_BYTE != 0 {
        return Err(DecodeError::BitLength { len: bits.len() });
    }
    Ok(bits
        .chunks_exact(BITS_PER_BYTE)
        .map(|chunk| {
            let mut group = [false; BITS_PER_BYTE];
            group.copy_from_slice(chunk);
            bits_to_byte(&group)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_to_bits_msb_first() {
        // 'A' = 0x41 = 01000001
        assert_eq!(
            byte_to_bits(b'A'),
            [false, true, false, false, false, false, false, true]
        );
        assert_eq!(byte_to_bits(0x00), [false; 8]);
        assert_eq!(byte_to_bits(0xFF), [true; 8]);
    }

    #[test]
    fn test_text_to_bits_length_and_order() {
        let bits = text_to_bits(b"Hi");
        assert_eq!(bits.len(), 16);
        assert_eq!(&bits[..8], &byte_to_bits(b'H'));
        assert_eq!(&bits[8..], &byte_to_bits(b'i'));
    }

    #[test]
    fn test_empty_text() {
        assert!(text_to_bits(b"").is_empty());
        assert_eq!(bits_to_text(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_bits_to_text_rejects_partial_byte() {
        let mut bits = text_to_bits(b"ok");
        bits.pop();
        assert_eq!(bits_to_text(&bits), Err(DecodeError::BitLength { len: 15 }));
    }

    #[test]
    fn test_every_byte_roundtrips() {
        for byte in 0..=255u8 {
            assert_eq!(bits_to_byte(&byte_to_bits(byte)), byte);
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_text_bits_roundtrip(text in proptest::collection::vec(proptest::num::u8::ANY, 0..64)) {
            let bits = text_to_bits(&text);
            proptest::prop_assert_eq!(bits.len(), text.len() * BITS_PER_BYTE);
            proptest::prop_assert_eq!(bits_to_text(&bits).unwrap(), text);
        }
    }
}

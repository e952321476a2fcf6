//! Knapsack encryption and trapdoor decryption.
//!
//! Encryption maps each plaintext byte to the subset sum of the public
//! elements its bits select: bit `j` (MSB first) selects element `j`.
//! Decryption multiplies a cipher value by the inverse multiplier modulo `q`,
//! which recovers the same subset sum over the private sequence, then peels
//! elements off greedily from the largest down.  Because the private
//! sequence is superincreasing and `q` exceeds its total, the greedy choice
//! at each step is forced and the recovered byte is unique.

use tracing::trace;

use crate::bits::{bits_to_byte, bits_to_text, byte_to_bits, text_to_bits, BITS_PER_BYTE};
use crate::error::{DecodeError, KnapsackError, Result};
use crate::field::Field;
use crate::keys::{PrivateKey, PublicKey, KEY_SIZE};
use crate::number_theory::gcd;

/// Encrypts `plaintext` into one cipher value per byte.
///
/// Values are plain integer sums of public elements, not reduced modulo
/// `q`; an empty plaintext yields an empty vector.
pub fn encrypt(plaintext: &[u8], public_key: &PublicKey) -> Vec<u64> {
    let bits = text_to_bits(plaintext);
    bits.chunks_exact(BITS_PER_BYTE)
        .map(|byte_bits| {
            byte_bits
                .iter()
                .zip(public_key.elements())
                .filter(|(bit, _)| **bit)
                .map(|(_, &b)| b)
                .sum::<u64>()
        })
        .collect()
}

/// Greedily decodes an unscaled knapsack sum against the private sequence.
///
/// Returns the recovered byte and whatever could not be subtracted.  A
/// non-zero residue means `reduced` is not a subset sum of `private_key`.
pub fn decode_value(reduced: u64, private_key: &PrivateKey) -> (u8, u64) {
    let mut remaining = reduced;
    let mut bits = [false; KEY_SIZE];
    for (j, &w) in private_key.elements().iter().enumerate().rev() {
        if remaining >= w {
            bits[j] = true;
            remaining -= w;
        }
    }
    (bits_to_byte(&bits), remaining)
}

/// Decrypts cipher values with the private sequence, modulus and inverse
/// multiplier.
///
/// Fails with [`KnapsackError::InvalidKey`] if the key material cannot drive
/// the greedy decoder, and with [`DecodeError`] for any value this key could
/// not have produced.  Nothing is truncated: either every value decodes or
/// the call fails.
pub fn decrypt(
    cipher_values: &[u64],
    private_key: &PrivateKey,
    modulus: u64,
    inverse_multiplier: u64,
) -> Result<Vec<u8>> {
    if !private_key.is_superincreasing() {
        return Err(KnapsackError::InvalidKey(
            "private sequence is not superincreasing".to_string(),
        ));
    }
    if modulus <= private_key.sum() || modulus % 2 == 0 {
        return Err(KnapsackError::InvalidKey(format!(
            "modulus {modulus} cannot unscale sums of this private sequence"
        )));
    }
    if gcd(inverse_multiplier, modulus) != 1 {
        return Err(KnapsackError::InvalidKey(format!(
            "inverse multiplier {inverse_multiplier} is not a unit modulo {modulus}"
        )));
    }

    let field = Field::new(modulus);
    let multiplier = field.inv(inverse_multiplier);
    let max = private_key
        .elements()
        .iter()
        .try_fold(0u64, |acc, &w| acc.checked_add(field.mul(multiplier, w)))
        .ok_or_else(|| {
            KnapsackError::InvalidKey(format!("modulus {modulus} overflows 64-bit cipher values"))
        })?;

    let mut bits = Vec::with_capacity(cipher_values.len() * BITS_PER_BYTE);
    for (index, &value) in cipher_values.iter().enumerate() {
        if value > max {
            return Err(DecodeError::ValueOutOfRange { index, value, max }.into());
        }
        let reduced = field.mul(value, inverse_multiplier);
        let (byte, residue) = decode_value(reduced, private_key);
        if residue != 0 {
            return Err(DecodeError::NotAKnapsackSum {
                index,
                value,
                residue,
            }
            .into());
        }
        trace!(index, value, reduced, byte, "decoded cipher value");
        bits.extend_from_slice(&byte_to_bits(byte));
    }
    Ok(bits_to_text(&bits)?)
}

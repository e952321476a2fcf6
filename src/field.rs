//! Arithmetic modulo the knapsack modulus.
//!
//! The [`Field`](struct.Field.html) type wraps the prime modulus `q` chosen at
//! key generation and performs the two reductions the cryptosystem needs:
//! scaling private elements by the multiplier, and unscaling cipher values by
//! its inverse.  Products are formed in `u128`, so any pair of `u64`
//! operands is reduced without overflow.

use crate::number_theory::mod_inverse;

/// Integers modulo an odd prime `q`.
///
/// `Field` does not test primality; callers supply a modulus they already
/// know to be prime.  Key generation draws it from
/// [`generate_prime`](crate::number_theory::generate_prime) and
/// [`KeyPair::from_parts`](crate::KeyPair::from_parts) checks it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    q: u64,
}

impl Field {
    /// Creates the field of integers modulo `q`.
    ///
    /// # Panics
    ///
    /// Panics if the modulus is less than 3 or even.
    pub fn new(q: u64) -> Self {
        assert!(q >= 3 && q % 2 == 1, "q must be an odd prime >= 3");
        Field { q }
    }

    /// Returns the modulus of the field.
    #[inline]
    pub fn modulus(&self) -> u64 {
        self.q
    }

    /// Reduces `a` into `[0, q)`.
    #[inline]
    pub fn reduce(&self, a: u64) -> u64 {
        a % self.q
    }

    /// Multiplies two integers and reduces the product modulo `q`.
    ///
    /// Operands need not be reduced beforehand.
    #[inline]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        ((a as u128 * b as u128) % self.q as u128) as u64
    }

    /// Computes the multiplicative inverse of `a` with the extended Euclidean
    /// algorithm.
    ///
    /// # Panics
    ///
    /// Panics if `a` is zero modulo `q`.
    #[inline]
    pub fn inv(&self, a: u64) -> u64 {
        let a = self.reduce(a);
        assert!(a != 0, "cannot invert zero");
        match mod_inverse(a, self.q) {
            Some(x) => x,
            None => panic!("{a} has no inverse modulo {}", self.q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Field;

    #[test]
    fn test_mul_reduces_unreduced_operands() {
        let field = Field::new(421);
        assert_eq!(field.mul(43, 210), 189);
        assert_eq!(field.mul(318, 235), 213);
        assert_eq!(field.mul(u64::MAX, u64::MAX), {
            let m = (u64::MAX % 421) as u128;
            ((m * m) % 421) as u64
        });
    }

    #[test]
    fn test_inv() {
        let field = Field::new(421);
        assert_eq!(field.inv(43), 235);
        assert_eq!(field.mul(43, field.inv(43)), 1);
    }

    #[test]
    #[should_panic(expected = "cannot invert zero")]
    fn test_inv_zero_panics() {
        Field::new(421).inv(842);
    }

    #[test]
    #[should_panic]
    fn test_even_modulus_rejected() {
        Field::new(420);
    }
}

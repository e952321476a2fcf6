//! Elementary number theory used by key generation.
//!
//! Everything here works on `u64` and widens to `i128`/`u128` wherever an
//! intermediate could exceed the operand width.

use crate::prng::RandomSource;

/// Returns `true` if `n` is prime, by trial division up to `floor(sqrt(n))`.
///
/// `0` and `1` are not prime.
pub fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    let mut i = 2u64;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Samples uniformly from `[min, max]` until a prime is drawn.
///
/// The range must contain at least one prime; otherwise this never returns.
/// Key generation only calls it with `[s + 1, 2s]`, which always holds one
/// by Bertrand's postulate.
///
/// # Panics
///
/// Panics if `min > max`.
pub fn generate_prime<R: RandomSource + ?Sized>(rng: &mut R, min: u64, max: u64) -> u64 {
    assert!(min <= max, "empty prime range [{min}, {max}]");
    loop {
        let candidate = rng.gen_range(min, max);
        if is_prime(candidate) {
            return candidate;
        }
    }
}

/// Greatest common divisor by the Euclidean algorithm; `gcd(a, 0) == a`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Computes the multiplicative inverse of `a` modulo `m`.
///
/// Returns the unique `x` in `[0, m)` with `a * x ≡ 1 (mod m)`, `Some(0)` for
/// the degenerate modulus `1`, and `None` when `a` and `m` share a factor.
pub fn mod_inverse(a: u64, m: u64) -> Option<u64> {
    if m == 1 {
        return Some(0);
    }
    if m == 0 || gcd(a % m, m) != 1 {
        return None;
    }
    let modulus = m as i128;
    let mut a = (a % m) as i128;
    let mut m = modulus;
    let mut x: i128 = 1;
    let mut y: i128 = 0;
    while a > 1 {
        let q = a / m;
        let t = m;
        m = a % m;
        a = t;
        let t = y;
        y = x - q * y;
        x = t;
    }
    if x < 0 {
        x += modulus;
    }
    Some(x as u64)
}

//! Key generation for the Merkle–Hellman knapsack.
//!
//! A key pair is built in one forward pass:
//!
//! 1. a superincreasing private sequence `W` of [`KEY_SIZE`] elements, each
//!    equal to the sum of its predecessors plus a random step in
//!    `1..=max_step`;
//! 2. a prime modulus `q` drawn from `[sum(W) + 1, 2 * sum(W)]`;
//! 3. a multiplier `r` in `[1, q - 1]` coprime to `q`, and its inverse `m`;
//! 4. the public sequence `B[i] = r * W[i] mod q`.
//!
//! The only loops without a fixed bound are the prime and coprime sampling,
//! both of which terminate quickly because the ranges are dense in
//! candidates.

use blake2::digest::{consts::U32, Digest};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KnapsackError, Result};
use crate::field::Field;
use crate::number_theory::{gcd, generate_prime, is_prime};
use crate::prng::RandomSource;
use crate::transcoder;

type Blake2b256 = blake2::Blake2b<U32>;

const FINGERPRINT_DOMAIN: &[u8] = b"MH_KNAPSACK_PUBKEY";

/// Number of elements in each key; one cipher value carries one byte.
pub const KEY_SIZE: usize = 8;

/// Default upper bound on the random step between private elements.
pub const MAX_STEP: u64 = 2;

/// Largest accepted `max_step`.
///
/// With every step at the bound the private sum is `255 * max_step`, the
/// modulus stays below `510 * max_step`, and the sum of all eight public
/// elements below `4080 * max_step`; dividing by 4096 keeps that in `u64`.
pub const MAX_STEP_LIMIT: u64 = u64::MAX / 4096;

/// Largest modulus accepted from outside: the bound generation can reach
/// with `max_step == MAX_STEP_LIMIT`.
pub const MAX_MODULUS: u64 = 510 * MAX_STEP_LIMIT;

/// Parameters for [`generate_key_pair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenConfig {
    /// Upper bound (inclusive) on the random step added to each private element.
    pub max_step: u64,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self { max_step: MAX_STEP }
    }
}

impl KeyGenConfig {
    /// Creates a configuration with the given step bound.
    pub fn new(max_step: u64) -> Self {
        Self { max_step }
    }

    /// Rejects step bounds that are empty or could overflow `u64` arithmetic.
    pub fn validate(&self) -> Result<()> {
        if self.max_step == 0 {
            return Err(KnapsackError::Config(
                "max_step must be at least 1".to_string(),
            ));
        }
        if self.max_step > MAX_STEP_LIMIT {
            return Err(KnapsackError::Config(format!(
                "max_step {} exceeds limit {MAX_STEP_LIMIT}",
                self.max_step
            )));
        }
        Ok(())
    }
}

/// The superincreasing private sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey([u64; KEY_SIZE]);

impl PrivateKey {
    /// Returns the elements in ascending order.
    pub fn elements(&self) -> &[u64; KEY_SIZE] {
        &self.0
    }

    /// Sum of every element.
    pub fn sum(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Returns `true` if every element exceeds the sum of all earlier ones.
    pub fn is_superincreasing(&self) -> bool {
        is_superincreasing(&self.0)
    }
}

/// The public knapsack sequence.
///
/// The sum of all elements always fits in `u64`, so no cipher value
/// overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u64; KEY_SIZE]")]
pub struct PublicKey([u64; KEY_SIZE]);

impl PublicKey {
    /// Wraps a public sequence received from a key holder.
    ///
    /// Fails with [`KnapsackError::InvalidKey`] if the elements sum past
    /// `u64::MAX`.
    pub fn new(elements: [u64; KEY_SIZE]) -> Result<Self> {
        match elements.iter().try_fold(0u64, |acc, &b| acc.checked_add(b)) {
            Some(_) => Ok(Self(elements)),
            None => Err(KnapsackError::InvalidKey(format!(
                "public sequence {elements:?} overflows 64-bit cipher values"
            ))),
        }
    }

    /// Returns the elements in bit order.
    pub fn elements(&self) -> &[u64; KEY_SIZE] {
        &self.0
    }

    /// Largest cipher value this key can produce (every bit set).
    pub fn max_sum(&self) -> u64 {
        self.0.iter().sum()
    }
}

impl TryFrom<[u64; KEY_SIZE]> for PublicKey {
    type Error = KnapsackError;

    fn try_from(elements: [u64; KEY_SIZE]) -> Result<Self> {
        Self::new(elements)
    }
}

/// Returns `true` if each element is strictly greater than the sum of its
/// predecessors.  Sums that overflow `u64` count as a violation.
pub fn is_superincreasing(sequence: &[u64]) -> bool {
    let mut running = 0u64;
    for &w in sequence {
        if w <= running {
            return false;
        }
        running = match running.checked_add(w) {
            Some(s) => s,
            None => return false,
        };
    }
    true
}

/// Complete key material for one run.
///
/// All fields are fixed after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
    modulus: u64,
    multiplier: u64,
    inverse_multiplier: u64,
}

impl KeyPair {
    /// Generates a key pair with the default [`KeyGenConfig`].
    pub fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::derive(rng, KeyGenConfig::default().max_step)
    }

    /// Assembles a key pair from known private material.
    ///
    /// The public sequence and inverse multiplier are derived.  Fails with
    /// [`KnapsackError::InvalidKey`] unless the private sequence is
    /// superincreasing with positive elements, `modulus` is a prime greater
    /// than its sum and at most [`MAX_MODULUS`], and `multiplier` lies in
    /// `[1, modulus - 1]`.
    ///
    /// Primality is checked by trial division, which near [`MAX_MODULUS`]
    /// takes on the order of `10^9` divisions.
    pub fn from_parts(private: [u64; KEY_SIZE], modulus: u64, multiplier: u64) -> Result<Self> {
        if !is_superincreasing(&private) {
            return Err(KnapsackError::InvalidKey(format!(
                "private sequence {private:?} is not superincreasing"
            )));
        }
        let total: u64 = private.iter().sum();
        if modulus <= total {
            return Err(KnapsackError::InvalidKey(format!(
                "modulus {modulus} must exceed private sum {total}"
            )));
        }
        if modulus > MAX_MODULUS {
            return Err(KnapsackError::InvalidKey(format!(
                "modulus {modulus} exceeds limit {MAX_MODULUS}"
            )));
        }
        if !is_prime(modulus) {
            return Err(KnapsackError::InvalidKey(format!(
                "modulus {modulus} is not prime"
            )));
        }
        if multiplier == 0 || multiplier >= modulus || gcd(multiplier, modulus) != 1 {
            return Err(KnapsackError::InvalidKey(format!(
                "multiplier {multiplier} is not a unit modulo {modulus}"
            )));
        }
        Ok(Self::assemble(PrivateKey(private), modulus, multiplier))
    }

    fn derive<R: RandomSource + ?Sized>(rng: &mut R, max_step: u64) -> Self {
        let mut w = [0u64; KEY_SIZE];
        let mut sum = 0u64;
        for slot in w.iter_mut() {
            *slot = sum + rng.gen_range(1, max_step);
            sum += *slot;
        }

        let modulus = generate_prime(rng, sum + 1, sum * 2);
        let multiplier = loop {
            let candidate = rng.gen_range(1, modulus - 1);
            if gcd(candidate, modulus) == 1 {
                break candidate;
            }
        };

        let pair = Self::assemble(PrivateKey(w), modulus, multiplier);
        debug!(
            modulus,
            multiplier,
            fingerprint = %pair.fingerprint(),
            "generated knapsack key pair"
        );
        pair
    }

    fn assemble(private_key: PrivateKey, modulus: u64, multiplier: u64) -> Self {
        debug_assert!(private_key.is_superincreasing());
        let field = Field::new(modulus);
        let inverse_multiplier = field.inv(multiplier);
        let public_key = PublicKey(private_key.0.map(|w| field.mul(multiplier, w)));
        Self {
            private_key,
            public_key,
            modulus,
            multiplier,
            inverse_multiplier,
        }
    }

    /// The superincreasing trapdoor sequence.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// The published knapsack sequence.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The prime modulus `q`.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// The multiplier `r`.
    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    /// The inverse `m` of the multiplier modulo `q`.
    pub fn inverse_multiplier(&self) -> u64 {
        self.inverse_multiplier
    }

    /// Hex BLAKE2b-256 digest of the public sequence.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Blake2b256::new();
        hasher.update(FINGERPRINT_DOMAIN);
        for element in self.public_key.elements() {
            hasher.update(element.to_be_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Encrypts `plaintext` under this pair's public key.
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u64> {
        transcoder::encrypt(plaintext, &self.public_key)
    }

    /// Decrypts cipher values with this pair's trapdoor.
    pub fn decrypt(&self, cipher_values: &[u64]) -> Result<Vec<u8>> {
        transcoder::decrypt(
            cipher_values,
            &self.private_key,
            self.modulus,
            self.inverse_multiplier,
        )
    }
}

/// Generates a key pair, validating `config` first.
pub fn generate_key_pair<R: RandomSource + ?Sized>(
    rng: &mut R,
    config: &KeyGenConfig,
) -> Result<KeyPair> {
    config.validate()?;
    Ok(KeyPair::derive(rng, config.max_step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::SimplePrng;

    const SAMPLE_PRIVATE: [u64; KEY_SIZE] = [2, 3, 6, 13, 27, 52, 105, 210];

    #[test]
    fn test_from_parts_sample_key() {
        let pair = KeyPair::from_parts(SAMPLE_PRIVATE, 421, 43).unwrap();
        assert_eq!(
            pair.public_key().elements(),
            &[86, 129, 258, 138, 319, 131, 305, 189]
        );
        assert_eq!(pair.inverse_multiplier(), 235);
        assert_eq!(pair.private_key().sum(), 418);
    }

    #[test]
    fn test_from_parts_rejects_bad_material() {
        let not_super = [1, 1, 3, 6, 12, 24, 48, 96];
        assert!(matches!(
            KeyPair::from_parts(not_super, 421, 43),
            Err(KnapsackError::InvalidKey(_))
        ));
        // 418 is the private sum; the modulus must exceed it.
        assert!(KeyPair::from_parts(SAMPLE_PRIVATE, 409, 43).is_err());
        // Composite modulus.
        assert!(KeyPair::from_parts(SAMPLE_PRIVATE, 423, 43).is_err());
        assert!(KeyPair::from_parts(SAMPLE_PRIVATE, 421, 0).is_err());
        assert!(KeyPair::from_parts(SAMPLE_PRIVATE, 421, 421).is_err());
    }

    #[test]
    fn test_public_key_rejects_overflowing_sum() {
        assert!(matches!(
            PublicKey::new([u64::MAX / 2; KEY_SIZE]),
            Err(KnapsackError::InvalidKey(_))
        ));
        let json = serde_json::to_string(&[u64::MAX / 2; KEY_SIZE]).unwrap();
        assert!(serde_json::from_str::<PublicKey>(&json).is_err());
        let fits = PublicKey::new([u64::MAX / 8; KEY_SIZE]).unwrap();
        assert_eq!(fits.max_sum(), (u64::MAX / 8) * 8);
    }

    #[test]
    fn test_from_parts_rejects_oversized_modulus() {
        // Rejected before any primality test runs.
        let err = KeyPair::from_parts(SAMPLE_PRIVATE, MAX_MODULUS + 2, 43).unwrap_err();
        assert!(matches!(err, KnapsackError::InvalidKey(msg) if msg.contains("exceeds limit")));
        assert!(MAX_MODULUS <= u64::MAX / KEY_SIZE as u64);
    }

    #[test]
    fn test_generated_pair_is_well_formed() {
        let mut rng = SimplePrng::new(2024);
        for _ in 0..32 {
            let pair = KeyPair::generate(&mut rng);
            let q = pair.modulus();
            assert!(pair.private_key().is_superincreasing());
            assert!(is_prime(q));
            assert!(q > pair.private_key().sum());
            assert!(q <= pair.private_key().sum() * 2);
            assert_eq!(gcd(pair.multiplier(), q), 1);
            assert_eq!(
                (pair.multiplier() as u128 * pair.inverse_multiplier() as u128) % q as u128,
                1
            );
            for (b, w) in pair
                .public_key()
                .elements()
                .iter()
                .zip(pair.private_key().elements())
            {
                assert_eq!(*b, (pair.multiplier() * w) % q);
            }
        }
    }

    #[test]
    fn test_private_steps_respect_max_step() {
        let mut rng = SimplePrng::new(5);
        let pair = KeyPair::generate(&mut rng);
        let mut running = 0;
        for &w in pair.private_key().elements() {
            let step = w - running;
            assert!((1..=MAX_STEP).contains(&step));
            running += w;
        }
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let a = KeyPair::generate(&mut SimplePrng::new(77));
        let b = KeyPair::generate(&mut SimplePrng::new(77));
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_config_validation() {
        let mut rng = SimplePrng::new(1);
        assert!(matches!(
            generate_key_pair(&mut rng, &KeyGenConfig::new(0)),
            Err(KnapsackError::Config(_))
        ));
        assert!(generate_key_pair(&mut rng, &KeyGenConfig::new(MAX_STEP_LIMIT + 1)).is_err());
        let pair = generate_key_pair(&mut rng, &KeyGenConfig::new(1000)).unwrap();
        assert!(pair.private_key().is_superincreasing());
    }

    #[test]
    fn test_is_superincreasing() {
        assert!(is_superincreasing(&SAMPLE_PRIVATE));
        assert!(is_superincreasing(&[]));
        assert!(!is_superincreasing(&[0, 1]));
        assert!(!is_superincreasing(&[2, 3, 5]));
        assert!(!is_superincreasing(&[u64::MAX, u64::MAX]));
    }

    proptest::proptest! {
        #[test]
        fn prop_generated_keys_invertible(seed in proptest::num::u64::ANY, step in 1u64..64) {
            let mut rng = SimplePrng::new(seed);
            let pair = generate_key_pair(&mut rng, &KeyGenConfig::new(step)).unwrap();
            proptest::prop_assert!(pair.private_key().is_superincreasing());
            proptest::prop_assert_eq!(gcd(pair.multiplier(), pair.modulus()), 1);
            let product = pair.multiplier() as u128 * pair.inverse_multiplier() as u128;
            proptest::prop_assert_eq!(product % pair.modulus() as u128, 1);
        }
    }
}

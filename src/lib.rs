#![deny(missing_docs)]

//! The design philosophy underlying `mh_knapsack` is pedagogical, yet arithmetically exact.
//! Each module isolates one step of the Merkle–Hellman construction, illustrating how a
//! trapdoor turns an intractable subset-sum problem into a greedy walk for the key holder.
//!
//! The scheme is historically broken by lattice reduction; this crate reproduces its
//! behaviour for study and offers no confidentiality.
//! # mh_knapsack
//!
//! **mh_knapsack** implements the Merkle–Hellman knapsack public-key
//! cryptosystem over eight-element keys, so that one cipher value carries
//! exactly one byte of plaintext.
//!
//! ## Features
//!
//! * **Number theory** in [`number_theory`](number_theory/index.html):
//!   trial-division primality, prime sampling, gcd and the extended
//!   Euclidean inverse.
//! * **Modular arithmetic** via the [`Field`](field/struct.Field.html) type,
//!   with `u128` intermediates so no product overflows.
//! * **Explicit randomness**: key generation draws from a caller-supplied
//!   [`RandomSource`]; [`SimplePrng`] is a BLAKE2b-256 stream that makes a
//!   fixed seed reproduce the same key pair.
//! * **Bit codec** in [`bits`](bits/index.html): bytes to MSB-first bits and
//!   back.
//! * **Key generation** in [`keys`](keys/index.html): superincreasing private
//!   sequence, prime modulus, coprime multiplier and its inverse, public
//!   sequence.
//! * **Encryption and decryption** in [`transcoder`](transcoder/index.html):
//!   subset sums under the public key, greedy decoding under the trapdoor.
//! * **Persistence helpers**: a one-line cipher text format and JSON key
//!   files.
//!
//! ## Usage
//!
//! ```rust
//! use mh_knapsack::{KeyPair, SimplePrng};
//!
//! // A fixed seed makes the example deterministic.
//! let mut rng = SimplePrng::new(42);
//! let pair = KeyPair::generate(&mut rng);
//!
//! let cipher = pair.encrypt(b"knapsack");
//! assert_eq!(cipher.len(), 8);
//! assert_eq!(pair.decrypt(&cipher).unwrap(), b"knapsack");
//! ```
//!
//! Known key material can be loaded directly:
//!
//! ```rust
//! use mh_knapsack::KeyPair;
//!
//! let pair = KeyPair::from_parts([2, 3, 6, 13, 27, 52, 105, 210], 421, 43).unwrap();
//! // 'A' = 01000001 selects public elements 1 and 7.
//! assert_eq!(pair.encrypt(b"A"), vec![129 + 189]);
//! assert_eq!(pair.inverse_multiplier(), 235);
//! ```

pub mod bits;
mod data;
mod error;
pub mod field;
mod io;
pub mod keys;
pub mod number_theory;
mod prng;
pub mod transcoder;

pub use bits::{bits_to_text, text_to_bits};
pub use data::{format_cipher_values, parse_cipher_values};
pub use error::{DecodeError, KnapsackError, Result};
pub use field::Field;
pub use io::{parse_key_pair, read_key_pair, write_key_pair};
pub use keys::{
    generate_key_pair, KeyGenConfig, KeyPair, PrivateKey, PublicKey, KEY_SIZE, MAX_MODULUS,
    MAX_STEP,
};
pub use number_theory::{gcd, generate_prime, is_prime, mod_inverse};
pub use prng::{RandomSource, SimplePrng};
pub use transcoder::{decrypt, encrypt};

//! Error types shared by the knapsack engine.
//!
//! Key generation and encryption cannot fail for well-formed inputs; the
//! fallible paths are decryption of foreign cipher values, loading key
//! material from outside, and the caller-facing input layer.

use thiserror::Error;

/// Top-level error returned by fallible operations in this crate.
#[derive(Debug, Error)]
pub enum KnapsackError {
    /// Plaintext was not supplied by the caller.
    #[error("input error: {0}")]
    Input(String),

    /// Cipher values or bit sequences could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Key material violates a structural requirement of the cryptosystem.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Key generation parameters are out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error while reading or writing key files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Key file is not valid JSON for a key pair.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while turning cipher values or bits back into bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Bit sequence length is not a whole number of bytes.
    #[error("bit sequence length {len} is not a multiple of 8")]
    BitLength {
        /// Number of bits supplied.
        len: usize,
    },

    /// Cipher value exceeds the largest sum the public key can produce.
    #[error("cipher value {value} at position {index} exceeds maximum knapsack sum {max}")]
    ValueOutOfRange {
        /// Position of the offending value.
        index: usize,
        /// The offending value.
        value: u64,
        /// Sum of every public key element.
        max: u64,
    },

    /// Greedy decoding left a remainder, so the value was not produced by this key.
    #[error("cipher value {value} at position {index} is not a knapsack sum (residue {residue})")]
    NotAKnapsackSum {
        /// Position of the offending value.
        index: usize,
        /// The offending value.
        value: u64,
        /// Remainder left after subtracting every selected private element.
        residue: u64,
    },

    /// Textual cipher token is not a decimal integer.
    #[error("malformed cipher token {token:?} at position {index}")]
    MalformedToken {
        /// Position of the offending token.
        index: usize,
        /// The token as it appeared in the input.
        token: String,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KnapsackError>;

//! JSON key files.
//!
//! A key file stores every component of a [`KeyPair`].  Loading rebuilds the
//! pair from its private half with [`KeyPair::from_parts`] and checks the
//! stored public sequence and inverse against the rebuilt ones, so a file
//! edited by hand cannot smuggle in inconsistent material.

use std::fs::{self, create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{KnapsackError, Result};
use crate::keys::{KeyPair, PrivateKey, PublicKey};

#[derive(Deserialize)]
struct KeyFile {
    private_key: PrivateKey,
    public_key: PublicKey,
    modulus: u64,
    multiplier: u64,
    inverse_multiplier: u64,
}

/// Writes `pair` as pretty-printed JSON, creating parent directories.
pub fn write_key_pair(path: impl AsRef<Path>, pair: &KeyPair) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, pair)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(path.to_path_buf())
}

/// Reads and validates a key file written by [`write_key_pair`].
pub fn read_key_pair(path: impl AsRef<Path>) -> Result<KeyPair> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_key_pair(&contents)
}

/// Parses and validates key file contents.
pub fn parse_key_pair(contents: &str) -> Result<KeyPair> {
    let file: KeyFile = serde_json::from_str(contents)?;
    let pair = KeyPair::from_parts(*file.private_key.elements(), file.modulus, file.multiplier)?;
    if pair.public_key() != &file.public_key {
        return Err(KnapsackError::InvalidKey(
            "stored public key does not match private key".to_string(),
        ));
    }
    if pair.inverse_multiplier() != file.inverse_multiplier {
        return Err(KnapsackError::InvalidKey(format!(
            "stored inverse {} does not match multiplier {}",
            file.inverse_multiplier, file.multiplier
        )));
    }
    Ok(pair)
}

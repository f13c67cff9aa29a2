// src/hash.rs

//! File fingerprints
//!
//! Fingerprints are lowercase hex MD5 digests of the full file content. MD5
//! is used for identity, not security: the ledger must keep matching the
//! values recorded by earlier installs.

use crate::error::{Error, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Compute the fingerprint of a file's content
pub fn fingerprint(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| {
        Error::IoError(format!("Failed to open {} for hashing: {}", path.display(), e))
    })?;

    let mut hasher = Md5::new();
    io::copy(&mut BufReader::new(file), &mut hasher).map_err(|e| {
        Error::IoError(format!("Failed to read {} for hashing: {}", path.display(), e))
    })?;

    Ok(hex::encode(hasher.finalize()))
}

/// Fingerprint of an in-memory buffer
pub fn fingerprint_bytes(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

//! SHA-256 digests for release artifacts.
//!
//! Digests are computed after a download completes, never inline with the
//! transfer, so a retried download always hashes the final bytes on disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

const BUF_SIZE: usize = 64 * 1024;

/// Lowercase hex SHA-256 digest (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Digest(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid sha256 digest '{0}': expected 64 hex characters")]
pub struct InvalidDigest(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("checksum mismatch: expected {expected}, got {actual}")]
pub struct ChecksumMismatch {
    pub expected: Sha256Digest,
    pub actual: Sha256Digest,
}

impl Sha256Digest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Sha256Digest {
    type Err = InvalidDigest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 64 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidDigest(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = InvalidDigest;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Sha256Digest> for String {
    fn from(d: Sha256Digest) -> Self {
        d.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hasher.finalize();
    Ok(hex::encode(digest))
}

/// Like [`sha256_path`] but returns a typed digest.
pub fn digest_path(path: &Path) -> Result<Sha256Digest> {
    Ok(Sha256Digest(sha256_path(path)?))
}

/// Hash `path` and compare against `expected`.
///
/// The outer `Result` carries I/O failures; the inner one carries a mismatch
/// so callers can tell "could not read" apart from "bytes are wrong".
pub fn verify_file(
    path: &Path,
    expected: &Sha256Digest,
) -> Result<std::result::Result<Sha256Digest, ChecksumMismatch>> {
    let actual = digest_path(path)?;
    if &actual == expected {
        Ok(Ok(actual))
    } else {
        Ok(Err(ChecksumMismatch {
            expected: expected.clone(),
            actual,
        }))
    }
}

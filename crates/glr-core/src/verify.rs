//! Download each artifact and compare its SHA-256 with the manifest.

use crate::arch::Arch;
use crate::checksum::{self, Sha256Digest};
use crate::fetch::{self, FetchOptions};
use crate::manifest::ReleaseManifest;
use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Outcome of hashing one downloaded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    pub arch: Arch,
    pub url: String,
    pub bytes: u64,
    pub expected: Sha256Digest,
    pub actual: Sha256Digest,
}

impl ArtifactReport {
    pub fn matches(&self) -> bool {
        self.expected == self.actual
    }
}

/// A downloaded artifact and its digest.
#[derive(Debug, Clone)]
pub struct Downloaded {
    pub url: String,
    pub bytes: u64,
    pub digest: Sha256Digest,
}

/// Download the artifact for `arch` into `dest` and hash it, without
/// comparing against the manifest.
pub fn download_artifact(
    manifest: &ReleaseManifest,
    arch: Arch,
    dest: &Path,
    opts: &FetchOptions,
    policy: &RetryPolicy,
) -> Result<Downloaded> {
    let url = manifest.artifact_url(arch)?;
    tracing::info!("fetching {} artifact {}", arch, url);
    let bytes = fetch::download_with_retry(&url, dest, opts, policy)
        .with_context(|| format!("download {}", url))?;
    let digest = checksum::digest_path(dest)?;
    Ok(Downloaded { url, bytes, digest })
}

/// Digest of the bytes currently served for `arch`. Used when cutting a
/// release, before the manifest knows the new checksum.
pub fn remote_digest(
    manifest: &ReleaseManifest,
    arch: Arch,
    opts: &FetchOptions,
    policy: &RetryPolicy,
) -> Result<Downloaded> {
    let staging = tempfile::tempdir().context("create staging directory")?;
    let asset = manifest.asset_name(arch)?;
    download_artifact(manifest, arch, &staging.path().join(asset), opts, policy)
}

/// Download the artifact for `arch` into `dest`, hash it and compare.
/// A mismatch is reported, not returned as an error.
pub fn fetch_and_hash(
    manifest: &ReleaseManifest,
    arch: Arch,
    dest: &Path,
    opts: &FetchOptions,
    policy: &RetryPolicy,
) -> Result<ArtifactReport> {
    let Downloaded { url, bytes, digest } = download_artifact(manifest, arch, dest, opts, policy)?;
    let report = ArtifactReport {
        arch,
        url,
        bytes,
        expected: manifest.checksum(arch).clone(),
        actual: digest,
    };
    if report.matches() {
        tracing::info!("{} checksum ok ({} bytes)", arch, bytes);
    } else {
        tracing::warn!(
            "{} checksum mismatch: expected {}, got {}",
            arch,
            report.expected,
            report.actual
        );
    }
    Ok(report)
}

/// Verify one architecture. The download is discarded afterwards.
pub fn verify_artifact(
    manifest: &ReleaseManifest,
    arch: Arch,
    opts: &FetchOptions,
    policy: &RetryPolicy,
) -> Result<ArtifactReport> {
    let staging = tempfile::tempdir().context("create staging directory")?;
    let asset = manifest.asset_name(arch)?;
    fetch_and_hash(manifest, arch, &staging.path().join(asset), opts, policy)
}

/// Verify every architecture in formula order. A mismatch in one arch does
/// not stop the others; transport failures do.
pub fn verify_all(
    manifest: &ReleaseManifest,
    opts: &FetchOptions,
    policy: &RetryPolicy,
) -> Result<Vec<ArtifactReport>> {
    Arch::ALL
        .iter()
        .map(|&arch| verify_artifact(manifest, arch, opts, policy))
        .collect()
}

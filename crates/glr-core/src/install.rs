//! Install a verified artifact as `<prefix>/bin/<binary>`.
//!
//! Mirrors the formula's install block: pick the artifact for the CPU
//! architecture, refuse it unless its checksum matches, then place it under
//! the binary name. Nothing lands at the final path until the bytes verify.

use crate::arch::Arch;
use crate::checksum::{self, ChecksumMismatch};
use crate::fetch::FetchOptions;
use crate::manifest::ReleaseManifest;
use crate::retry::RetryPolicy;
use crate::storage;
use crate::verify;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the artifact bytes come from.
#[derive(Debug, Clone)]
pub enum ArtifactSource {
    /// Fetch the manifest URL for the chosen architecture.
    Download,
    /// Use a file already on disk (e.g. a CI build output).
    Local(PathBuf),
}

#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub arch: Arch,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Staging file next to the destination so the final rename stays on one filesystem.
fn staging_path(bin_dir: &Path, binary: &str) -> PathBuf {
    bin_dir.join(format!(".{}.download", binary))
}

/// Install the artifact for `arch` under `prefix`.
pub fn install(
    manifest: &ReleaseManifest,
    arch: Arch,
    source: &ArtifactSource,
    prefix: &Path,
    opts: &FetchOptions,
    policy: &RetryPolicy,
) -> Result<InstallOutcome> {
    let binary = manifest.binary_name();
    let bin_dir = prefix.join("bin");
    fs::create_dir_all(&bin_dir)
        .with_context(|| format!("create directory {}", bin_dir.display()))?;
    let staged = staging_path(&bin_dir, binary);
    let dest = bin_dir.join(binary);

    let result = stage_and_place(manifest, arch, source, &staged, &dest, opts, policy);
    if result.is_err() && staged.exists() {
        let _ = fs::remove_file(&staged);
    }
    result
}

fn stage_and_place(
    manifest: &ReleaseManifest,
    arch: Arch,
    source: &ArtifactSource,
    staged: &Path,
    dest: &Path,
    opts: &FetchOptions,
    policy: &RetryPolicy,
) -> Result<InstallOutcome> {
    let bytes = match source {
        ArtifactSource::Download => {
            let report = verify::fetch_and_hash(manifest, arch, staged, opts, policy)?;
            if !report.matches() {
                return Err(ChecksumMismatch {
                    expected: report.expected,
                    actual: report.actual,
                })
                .with_context(|| format!("refusing to install {} artifact {}", arch, report.url));
            }
            report.bytes
        }
        ArtifactSource::Local(path) => {
            let bytes = fs::copy(path, staged).with_context(|| {
                format!("copy {} -> {}", path.display(), staged.display())
            })?;
            checksum::verify_file(staged, manifest.checksum(arch))?
                .with_context(|| format!("refusing to install {}", path.display()))?;
            bytes
        }
    };

    storage::make_executable(staged)?;
    storage::finalize(staged, dest)?;
    tracing::info!(
        "installed {} {} ({}, {} bytes) to {}",
        manifest.name,
        manifest.version,
        arch,
        bytes,
        dest.display()
    );
    Ok(InstallOutcome {
        arch,
        path: dest.to_path_buf(),
        bytes,
    })
}

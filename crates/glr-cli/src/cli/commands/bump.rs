//! `glr bump <version>` – cut a release in the manifest.

use anyhow::{Context, Result};
use glr_core::arch::Arch;
use glr_core::checksum::Sha256Digest;
use glr_core::config::GlrConfig;
use glr_core::manifest::ReleaseManifest;
use glr_core::verify;
use semver::Version;
use std::collections::BTreeMap;
use std::path::Path;

/// Parse one `--sha256 ARCH=HEX` argument.
pub(crate) fn parse_checksum_arg(arg: &str) -> Result<(Arch, Sha256Digest)> {
    let (arch, hex) = arg
        .split_once('=')
        .with_context(|| format!("expected ARCH=HEX, got '{}'", arg))?;
    let arch: Arch = arch.parse()?;
    let digest: Sha256Digest = hex.parse()?;
    Ok((arch, digest))
}

pub async fn run_bump(
    manifest_path: &Path,
    cfg: &GlrConfig,
    version: &str,
    sha256: &[String],
    fetch: bool,
) -> Result<()> {
    let mut manifest = ReleaseManifest::load(manifest_path)?;
    let version = Version::parse(version.trim_start_matches('v'))
        .with_context(|| format!("invalid version '{}'", version))?;

    let mut given = BTreeMap::new();
    for arg in sha256 {
        let (arch, digest) = parse_checksum_arg(arg)?;
        if given.insert(arch, digest).is_some() {
            anyhow::bail!("--sha256 given twice for {}", arch);
        }
    }
    if !fetch {
        if let Some(arch) = Arch::ALL.into_iter().find(|a| !given.contains_key(a)) {
            anyhow::bail!(
                "no checksum for {arch}; pass --sha256 {arch}=<hex> or --fetch to download it"
            );
        }
    }

    let old = manifest.bump(version)?;
    for arch in Arch::ALL {
        let digest = match given.remove(&arch) {
            Some(d) => d,
            None => {
                let downloaded = tokio::task::spawn_blocking({
                    let manifest = manifest.clone();
                    let opts = cfg.fetch_options();
                    let policy = cfg.retry_policy();
                    move || verify::remote_digest(&manifest, arch, &opts, &policy)
                })
                .await
                .context("fetch task join")??;
                println!("{:<6} {}  {}", arch, downloaded.digest, downloaded.url);
                downloaded.digest
            }
        };
        manifest.set_checksum(arch, digest);
    }

    manifest.save(manifest_path)?;
    println!(
        "Bumped {} {} -> {} in {}",
        manifest.name,
        old,
        manifest.version,
        manifest_path.display()
    );
    Ok(())
}

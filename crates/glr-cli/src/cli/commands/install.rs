//! `glr install` – install the verified artifact and smoke-test it.

use anyhow::{Context, Result};
use glr_core::arch::Arch;
use glr_core::config::GlrConfig;
use glr_core::install::{self, ArtifactSource};
use glr_core::manifest::ReleaseManifest;
use glr_core::smoke;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct InstallArgs {
    pub prefix: Option<PathBuf>,
    pub arch: Option<Arch>,
    pub from: Option<PathBuf>,
    pub skip_smoke: bool,
}

pub async fn run_install(manifest_path: &Path, cfg: &GlrConfig, args: InstallArgs) -> Result<()> {
    let manifest = ReleaseManifest::load(manifest_path)?;
    let prefix = args
        .prefix
        .or_else(|| cfg.install_prefix.clone())
        .context("no install prefix; pass --prefix or set install_prefix in config.toml")?;
    let arch = match args.arch {
        Some(a) => a,
        None => Arch::host()?,
    };
    let source = match args.from {
        Some(path) => ArtifactSource::Local(path),
        None => ArtifactSource::Download,
    };

    let outcome = tokio::task::spawn_blocking({
        let manifest = manifest.clone();
        let opts = cfg.fetch_options();
        let policy = cfg.retry_policy();
        move || install::install(&manifest, arch, &source, &prefix, &opts, &policy)
    })
    .await
    .context("install task join")??;
    println!(
        "Installed {} {} ({}) to {}",
        manifest.name,
        manifest.version,
        outcome.arch,
        outcome.path.display()
    );

    if args.skip_smoke {
        tracing::info!("smoke test skipped");
        return Ok(());
    }

    let report = tokio::task::spawn_blocking({
        let path = outcome.path.clone();
        let expected = manifest.version.to_string();
        let timeout = cfg.smoke_timeout();
        move || smoke::smoke_test(&path, &expected, timeout)
    })
    .await
    .context("smoke task join")?
    .with_context(|| format!("smoke test failed for {}", outcome.path.display()))?;
    println!("Smoke test ok: {}", report.version_line);
    Ok(())
}

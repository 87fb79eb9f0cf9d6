//! `glr smoke <binary>` – run the post-install smoke test.

use anyhow::{Context, Result};
use glr_core::config::GlrConfig;
use glr_core::manifest::ReleaseManifest;
use glr_core::smoke;
use std::path::Path;

pub async fn run_smoke(
    manifest_path: &Path,
    cfg: &GlrConfig,
    binary: &Path,
    expect_version: Option<String>,
) -> Result<()> {
    let expected = match expect_version {
        Some(v) => v,
        None => ReleaseManifest::load(manifest_path)?.version.to_string(),
    };

    let report = tokio::task::spawn_blocking({
        let binary = binary.to_path_buf();
        let expected = expected.clone();
        let timeout = cfg.smoke_timeout();
        move || smoke::smoke_test(&binary, &expected, timeout)
    })
    .await
    .context("smoke task join")?
    .with_context(|| format!("smoke test failed for {}", binary.display()))?;

    println!("{}: --help ok, --version ok ({})", binary.display(), report.version_line);
    Ok(())
}

//! `glr verify` – download artifacts and compare checksums.

use anyhow::{Context, Result};
use glr_core::arch::Arch;
use glr_core::config::GlrConfig;
use glr_core::manifest::ReleaseManifest;
use glr_core::verify::{self, ArtifactReport};
use std::path::Path;

fn print_reports(reports: &[ArtifactReport]) {
    println!("{:<6} {:<8} {:>12} {}", "ARCH", "RESULT", "BYTES", "URL");
    for r in reports {
        let result = if r.matches() { "ok" } else { "MISMATCH" };
        println!("{:<6} {:<8} {:>12} {}", r.arch, result, r.bytes, r.url);
        if !r.matches() {
            println!("       expected {}", r.expected);
            println!("       actual   {}", r.actual);
        }
    }
}

pub async fn run_verify(
    manifest_path: &Path,
    cfg: &GlrConfig,
    arch: Option<Arch>,
    json: bool,
) -> Result<()> {
    let manifest = ReleaseManifest::load(manifest_path)?;
    let reports = tokio::task::spawn_blocking({
        let manifest = manifest.clone();
        let opts = cfg.fetch_options();
        let policy = cfg.retry_policy();
        move || match arch {
            Some(arch) => verify::verify_artifact(&manifest, arch, &opts, &policy).map(|r| vec![r]),
            None => verify::verify_all(&manifest, &opts, &policy),
        }
    })
    .await
    .context("verify task join")??;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports);
    }

    let mismatched = reports.iter().filter(|r| !r.matches()).count();
    if mismatched > 0 {
        anyhow::bail!(
            "{} artifact(s) of {} {} failed checksum verification",
            mismatched,
            manifest.name,
            manifest.version
        );
    }
    Ok(())
}

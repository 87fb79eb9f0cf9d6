//! `glr probe` – HEAD every artifact URL.

use anyhow::{Context, Result};
use glr_core::arch::Arch;
use glr_core::config::GlrConfig;
use glr_core::fetch::{self, HeadResult};
use glr_core::manifest::ReleaseManifest;
use std::path::Path;

pub async fn run_probe(manifest_path: &Path, cfg: &GlrConfig, json: bool) -> Result<()> {
    let manifest = ReleaseManifest::load(manifest_path)?;

    let mut results: Vec<(Arch, String, Result<HeadResult, String>)> = Vec::new();
    for arch in Arch::ALL {
        let url = manifest.artifact_url(arch)?;
        let head = tokio::task::spawn_blocking({
            let url = url.clone();
            let opts = cfg.fetch_options();
            let policy = cfg.retry_policy();
            move || fetch::probe_with_retry(&url, &opts, &policy)
        })
        .await
        .context("probe task join")?
        .map_err(|e| e.to_string());
        results.push((arch, url, head));
    }

    if json {
        let rows: Vec<serde_json::Value> = results
            .iter()
            .map(|(arch, url, head)| match head {
                Ok(h) => serde_json::json!({ "arch": arch, "url": url, "ok": true, "head": h }),
                Err(e) => serde_json::json!({ "arch": arch, "url": url, "ok": false, "error": e }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{:<6} {:<6} {:>12} {}", "ARCH", "STATUS", "SIZE", "URL");
        for (arch, url, head) in &results {
            match head {
                Ok(h) => {
                    let size = h
                        .content_length
                        .map(|s| format!("{s}"))
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:<6} {:<6} {:>12} {}", arch, "ok", size, url);
                }
                Err(e) => println!("{:<6} {:<6} {:>12} {} ({})", arch, "error", "-", url, e),
            }
        }
    }

    let failed = results.iter().filter(|(_, _, h)| h.is_err()).count();
    if failed > 0 {
        anyhow::bail!("{} artifact URL(s) unreachable", failed);
    }
    Ok(())
}

//! `glr render` – write the formula rendered from the manifest.

use anyhow::Result;
use glr_core::formula;
use glr_core::manifest::ReleaseManifest;
use glr_core::storage;
use std::path::Path;

pub fn run_render(manifest_path: &Path, output: Option<&Path>) -> Result<()> {
    let manifest = ReleaseManifest::load(manifest_path)?;
    let text = formula::render(&manifest)?;
    match output {
        Some(path) => {
            storage::write_atomic(path, text.as_bytes())?;
            tracing::info!("rendered {} {} to {}", manifest.name, manifest.version, path.display());
            println!("Wrote {} ({} {})", path.display(), manifest.name, manifest.version);
        }
        None => print!("{}", text),
    }
    Ok(())
}

//! `glr check <formula>` – detect drift between a committed formula and the manifest.

use anyhow::{Context, Result};
use glr_core::formula;
use glr_core::manifest::ReleaseManifest;
use std::fs;
use std::path::Path;

pub fn run_check(manifest_path: &Path, formula_path: &Path) -> Result<()> {
    let manifest = ReleaseManifest::load(manifest_path)?;
    let existing = fs::read_to_string(formula_path)
        .with_context(|| format!("read formula {}", formula_path.display()))?;
    match formula::check_drift(&manifest, &existing)? {
        None => {
            println!(
                "{} is up to date with {} {}",
                formula_path.display(),
                manifest.name,
                manifest.version
            );
            Ok(())
        }
        Some(drift) => {
            tracing::warn!("{} drifted at line {}", formula_path.display(), drift.line);
            anyhow::bail!(
                "{}: {}\nrun `glr render -o {}` to regenerate it",
                formula_path.display(),
                drift,
                formula_path.display()
            )
        }
    }
}

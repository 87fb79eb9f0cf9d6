//! `glr import <formula>` – turn a hand-written formula into a release manifest.

use anyhow::{Context, Result};
use glr_core::formula;
use std::fs;
use std::path::Path;

pub fn run_import(formula_path: &Path, output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite it",
            output.display()
        );
    }
    let text = fs::read_to_string(formula_path)
        .with_context(|| format!("read formula {}", formula_path.display()))?;
    let manifest = formula::parse(&text)
        .with_context(|| format!("parse formula {}", formula_path.display()))?;
    manifest.save(output)?;
    println!(
        "Imported {} {} from {} into {}",
        manifest.name,
        manifest.version,
        formula_path.display(),
        output.display()
    );
    Ok(())
}

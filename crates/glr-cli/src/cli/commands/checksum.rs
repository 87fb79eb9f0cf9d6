//! `glr checksum <path>` – compute SHA-256 of a file.

use anyhow::{Context, Result};
use glr_core::checksum;
use std::path::PathBuf;

/// Compute and print SHA-256 of the given file, in `shasum` format.
pub async fn run_checksum(path: &str) -> Result<()> {
    let path = PathBuf::from(path);
    let digest = tokio::task::spawn_blocking({
        let path = path.clone();
        move || checksum::sha256_path(&path)
    })
    .await
    .context("checksum task join")??;
    println!("{}  {}", digest, path.display());
    Ok(())
}

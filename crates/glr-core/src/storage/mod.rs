//! File lifecycle for rendered formulas, manifests and installed binaries.
//!
//! Everything is written to a `.part` sibling first, synced, and then renamed
//! over the final path, so a reader never observes a half-written file.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `gitlike.rb` → `gitlike.rb.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Write `contents` to `path` atomically (temp file + fsync + rename).
/// Creates parent directories as needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tp = temp_path(path);
    {
        let mut f = File::create(&tp).with_context(|| format!("create {}", tp.display()))?;
        f.write_all(contents)
            .with_context(|| format!("write {}", tp.display()))?;
        f.sync_all().context("storage sync failed")?;
    }
    finalize(&tp, path)
}

/// Atomically rename `temp` over `final_path`. Fails if they are on different filesystems.
pub fn finalize(temp: &Path, final_path: &Path) -> Result<()> {
    fs::rename(temp, final_path).with_context(|| {
        format!(
            "rename {} -> {}",
            temp.display(),
            final_path.display()
        )
    })
}

/// Set the executable bits (0755) on unix; no-op elsewhere.
pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)
            .with_context(|| format!("stat {}", path.display()))?
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)
            .with_context(|| format!("chmod {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("gitlike.rb"));
        assert_eq!(p.to_string_lossy(), "gitlike.rb.part");
        let p2 = temp_path(Path::new("/tmp/bin/gitlike"));
        assert_eq!(p2.to_string_lossy(), "/tmp/bin/gitlike.part");
    }

    #[test]
    fn write_atomic_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Formula").join("gitlike.rb");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!temp_path(&path).exists());
    }

    #[cfg(unix)]
    #[test]
    fn make_executable_sets_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool");
        fs::write(&path, b"#!/bin/sh\n").unwrap();
        make_executable(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

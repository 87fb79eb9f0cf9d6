//! Detect a committed formula that no longer matches its manifest.

use super::render::render;
use crate::manifest::{ManifestError, ReleaseManifest};
use serde::Serialize;
use std::fmt;

/// First difference between the rendered and the committed formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drift {
    /// 1-based line number.
    pub line: usize,
    /// Line the manifest renders, `None` if the committed file is longer.
    pub expected: Option<String>,
    /// Line in the committed file, `None` if it ends early.
    pub found: Option<String>,
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "formula drifted from manifest at line {}", self.line)?;
        match &self.expected {
            Some(l) => writeln!(f, "  expected: {}", l.trim())?,
            None => writeln!(f, "  expected: <end of file>")?,
        }
        match &self.found {
            Some(l) => write!(f, "  found:    {}", l.trim()),
            None => write!(f, "  found:    <end of file>"),
        }
    }
}

fn normalized(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Compare `existing` against the formula rendered from `manifest`, ignoring
/// trailing whitespace and trailing blank lines. `Ok(None)` means in sync.
pub fn check_drift(
    manifest: &ReleaseManifest,
    existing: &str,
) -> Result<Option<Drift>, ManifestError> {
    let rendered = render(manifest)?;
    let want = normalized(&rendered);
    let have = normalized(existing);

    for i in 0..want.len().max(have.len()) {
        let (w, h) = (want.get(i), have.get(i));
        if w != h {
            return Ok(Some(Drift {
                line: i + 1,
                expected: w.map(|s| s.to_string()),
                found: h.map(|s| s.to_string()),
            }));
        }
    }
    Ok(None)
}

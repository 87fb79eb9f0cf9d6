//! Read an existing formula back into a release manifest.
//!
//! Only the shape produced by [`super::render`] (and the hand-written
//! formulas it replaces) is understood; this is not a Ruby parser.

use super::ruby::read_string;
use crate::arch::Arch;
use crate::checksum::Sha256Digest;
use crate::manifest::{Artifact, Artifacts, ManifestError, ReleaseManifest};
use semver::Version;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormulaParseError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("formula has no {0}")]
    Missing(&'static str),
    #[error("line {line}: invalid version '{value}'")]
    InvalidVersion { line: usize, value: String },
    #[error("line {line}: invalid sha256 '{value}'")]
    InvalidChecksum { line: usize, value: String },
    #[error("formula does not describe a valid release: {0}")]
    Manifest(#[from] ManifestError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Top,
    Branch(Arch),
    Install,
    Test,
}

#[derive(Default)]
struct Branch {
    url: Option<String>,
    sha256: Option<Sha256Digest>,
}

impl Branch {
    fn into_artifact(
        self,
        missing_url: &'static str,
        missing_sha: &'static str,
    ) -> Result<Artifact, FormulaParseError> {
        Ok(Artifact {
            url: Some(self.url.ok_or(FormulaParseError::Missing(missing_url))?),
            sha256: self.sha256.ok_or(FormulaParseError::Missing(missing_sha))?,
        })
    }
}

fn syntax(line: usize, message: impl Into<String>) -> FormulaParseError {
    FormulaParseError::Syntax {
        line,
        message: message.into(),
    }
}

/// Homebrew's file name for a formula class: `MyTool` → `my-tool`.
fn name_from_class(class: &str) -> String {
    let mut out = String::with_capacity(class.len() + 4);
    for (i, c) in class.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn quoted(rest: &str, line: usize, what: &str) -> Result<String, FormulaParseError> {
    read_string(rest)
        .map(|(v, _)| v)
        .ok_or_else(|| syntax(line, format!("expected quoted {what}")))
}

/// Parse formula text into a manifest with explicit per-architecture URLs.
pub fn parse(text: &str) -> Result<ReleaseManifest, FormulaParseError> {
    let mut section = Section::Top;
    let mut class: Option<String> = None;
    let mut desc: Option<String> = None;
    let mut homepage: Option<String> = None;
    let mut version: Option<Version> = None;
    let mut binary: Option<String> = None;
    let mut arm = Branch::default();
    let mut amd = Branch::default();
    let mut saw_else = false;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line {
            "if Hardware::CPU.arm?" if section == Section::Top => {
                section = Section::Branch(Arch::Arm64);
                continue;
            }
            "else" if section == Section::Branch(Arch::Arm64) => {
                section = Section::Branch(Arch::Amd64);
                saw_else = true;
                continue;
            }
            "def install" if section == Section::Top => {
                section = Section::Install;
                continue;
            }
            "test do" if section == Section::Top => {
                section = Section::Test;
                continue;
            }
            "end" => {
                section = Section::Top;
                continue;
            }
            _ => {}
        }

        if let Some(rest) = line.strip_prefix("class ") {
            let (name, parent) = rest
                .split_once('<')
                .ok_or_else(|| syntax(line_no, "class must inherit from Formula"))?;
            if parent.trim() != "Formula" {
                return Err(syntax(line_no, "class must inherit from Formula"));
            }
            class = Some(name.trim().to_string());
            continue;
        }

        let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match (section, keyword) {
            (Section::Top, "desc") => desc = Some(quoted(rest, line_no, "desc")?),
            (Section::Top, "homepage") => homepage = Some(quoted(rest, line_no, "homepage")?),
            (Section::Top, "version") => {
                let value = quoted(rest, line_no, "version")?;
                let parsed = Version::parse(&value).map_err(|_| {
                    FormulaParseError::InvalidVersion {
                        line: line_no,
                        value: value.clone(),
                    }
                })?;
                version = Some(parsed);
            }
            (Section::Top, "url" | "sha256") => {
                return Err(syntax(
                    line_no,
                    format!("{keyword} outside the Hardware::CPU.arm? branch"),
                ));
            }
            (Section::Branch(arch), "url" | "sha256") => {
                let branch = match arch {
                    Arch::Arm64 => &mut arm,
                    Arch::Amd64 => &mut amd,
                };
                let value = quoted(rest, line_no, keyword)?;
                if keyword == "url" {
                    branch.url = Some(value);
                } else {
                    let digest = value.parse::<Sha256Digest>().map_err(|_| {
                        FormulaParseError::InvalidChecksum {
                            line: line_no,
                            value: value.clone(),
                        }
                    })?;
                    branch.sha256 = Some(digest);
                }
            }
            (Section::Install, "bin.install") if binary.is_none() => {
                let (_, after_asset) = read_string(rest)
                    .ok_or_else(|| syntax(line_no, "expected quoted asset name"))?;
                let target = after_asset
                    .trim_start()
                    .strip_prefix("=>")
                    .ok_or_else(|| syntax(line_no, "expected `=> \"binary\"`"))?;
                binary = Some(quoted(target, line_no, "binary name")?);
            }
            // Other stanzas (license, depends_on, test assertions) are not part of the record.
            _ => {}
        }
    }

    let class = class.ok_or(FormulaParseError::Missing("class declaration"))?;
    if !saw_else {
        return Err(FormulaParseError::Missing("else branch for Intel"));
    }

    let name = name_from_class(&class);
    let mut manifest = ReleaseManifest {
        class_name: None,
        desc: desc.ok_or(FormulaParseError::Missing("desc"))?,
        homepage: homepage.ok_or(FormulaParseError::Missing("homepage"))?,
        version: version.ok_or(FormulaParseError::Missing("version"))?,
        binary: binary.filter(|b| *b != name),
        url_template: None,
        artifacts: Artifacts {
            arm64: arm.into_artifact("arm64 url", "arm64 sha256")?,
            amd64: amd.into_artifact("amd64 url", "amd64 sha256")?,
        },
        name,
    };
    if manifest.class_name() != class {
        manifest.class_name = Some(class);
    }
    manifest.validate()?;
    Ok(manifest)
}

//! Release manifest: the single record a formula is rendered from.
//!
//! One `release.toml` per project replaces a hand-edited formula per release:
//!
//! ```toml
//! name = "gitlike"
//! desc = "GitLike CLI with Git-like workflow for developers"
//! homepage = "https://github.com/bigdog156/gitlike"
//! version = "1.0.2"
//! url_template = "https://github.com/bigdog156/gitlike/releases/download/{tag}/{name}-darwin-{arch}"
//!
//! [artifacts.arm64]
//! sha256 = "b735c7ff84540daaf8d5d748e80ba524199e8fa2b9110b0fe16b2b8d62c52a7a"
//!
//! [artifacts.amd64]
//! sha256 = "..."
//! ```

mod template;

pub use template::{expand, TemplateVars};

use crate::arch::Arch;
use crate::checksum::Sha256Digest;
use crate::storage;
use crate::url_model;
use anyhow::{Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default manifest file name, looked up in the working directory.
pub const DEFAULT_MANIFEST: &str = "release.toml";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),
    #[error("homepage '{0}' is not an http(s) URL")]
    InvalidHomepage(String),
    #[error("artifact {0} has no url and the manifest has no url_template")]
    MissingUrl(Arch),
    #[error("artifact {arch} url '{url}' is not an http(s) URL")]
    InvalidUrl { arch: Arch, url: String },
    #[error("artifact {arch} url '{url}' has no file name in its path")]
    NoAssetName { arch: Arch, url: String },
    #[error("both artifacts resolve to the same asset name '{0}'")]
    DuplicateAsset(String),
    #[error("unknown placeholder '{{{0}}}' in url_template")]
    UnknownPlaceholder(String),
    #[error("unterminated placeholder in url_template '{0}'")]
    UnclosedPlaceholder(String),
    #[error("binary name '{0}' must be a plain file name")]
    InvalidBinary(String),
    #[error("class name '{0}' is not a Ruby constant")]
    InvalidClassName(String),
    #[error("artifact {arch} url '{url}' does not contain version {version}; update it by hand")]
    UrlWithoutVersion {
        arch: Arch,
        url: String,
        version: Version,
    },
}

/// One prebuilt artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Explicit download URL; overrides `url_template` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub sha256: Sha256Digest,
}

/// Per-architecture artifacts. Both entries are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifacts {
    pub arm64: Artifact,
    pub amd64: Artifact,
}

impl Artifacts {
    pub fn get(&self, arch: Arch) -> &Artifact {
        match arch {
            Arch::Arm64 => &self.arm64,
            Arch::Amd64 => &self.amd64,
        }
    }

    pub fn get_mut(&mut self, arch: Arch) -> &mut Artifact {
        match arch {
            Arch::Arm64 => &mut self.arm64,
            Arch::Amd64 => &mut self.amd64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseManifest {
    /// Package name, e.g. `gitlike`.
    pub name: String,
    /// Ruby class name for the formula; derived from `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub desc: String,
    pub homepage: String,
    pub version: Version,
    /// Installed executable name; defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_template: Option<String>,
    pub artifacts: Artifacts,
}

impl ReleaseManifest {
    /// Read, parse and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("read manifest {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("manifest {}", path.display()))
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        let manifest: ReleaseManifest = toml::from_str(data).context("parse release manifest")?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate, then write atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        storage::write_atomic(path, self.to_toml_string()?.as_bytes())?;
        tracing::info!("wrote manifest {} (version {})", path.display(), self.version);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.name.trim().is_empty() {
            return Err(ManifestError::EmptyField("name"));
        }
        if self.desc.trim().is_empty() {
            return Err(ManifestError::EmptyField("desc"));
        }
        if !url_model::is_http_url(&self.homepage) {
            return Err(ManifestError::InvalidHomepage(self.homepage.clone()));
        }
        let binary = self.binary_name();
        if binary.is_empty() || binary.contains(['/', '\\']) || binary == "." || binary == ".." {
            return Err(ManifestError::InvalidBinary(binary.to_string()));
        }
        let class = self.class_name();
        if !is_ruby_constant(&class) {
            return Err(ManifestError::InvalidClassName(class));
        }
        let mut assets = Vec::with_capacity(Arch::ALL.len());
        for arch in Arch::ALL {
            assets.push(self.asset_name(arch)?);
        }
        if assets[0] == assets[1] {
            return Err(ManifestError::DuplicateAsset(assets[0].clone()));
        }
        Ok(())
    }

    /// Release tag, `v<version>`.
    pub fn tag(&self) -> String {
        format!("v{}", self.version)
    }

    pub fn binary_name(&self) -> &str {
        self.binary.as_deref().unwrap_or(&self.name)
    }

    /// Explicit `class_name`, or CamelCase of `name` split on `-`, `_` and `.`.
    pub fn class_name(&self) -> String {
        if let Some(c) = &self.class_name {
            return c.clone();
        }
        self.name
            .split(['-', '_', '.'])
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect()
    }

    pub fn artifact(&self, arch: Arch) -> &Artifact {
        self.artifacts.get(arch)
    }

    /// Resolved, validated download URL for `arch`.
    pub fn artifact_url(&self, arch: Arch) -> Result<String, ManifestError> {
        let url = match (&self.artifact(arch).url, &self.url_template) {
            (Some(url), _) => url.clone(),
            (None, Some(template)) => {
                let version = self.version.to_string();
                let tag = self.tag();
                template::expand(
                    template,
                    &TemplateVars {
                        name: &self.name,
                        version: &version,
                        tag: &tag,
                        arch: arch.as_str(),
                    },
                )?
            }
            (None, None) => return Err(ManifestError::MissingUrl(arch)),
        };
        if !url_model::is_http_url(&url) {
            return Err(ManifestError::InvalidUrl { arch, url });
        }
        Ok(url)
    }

    /// File name the artifact is staged under (last URL path segment).
    pub fn asset_name(&self, arch: Arch) -> Result<String, ManifestError> {
        let url = self.artifact_url(arch)?;
        url_model::filename_from_url_path(&url).ok_or(ManifestError::NoAssetName { arch, url })
    }

    pub fn checksum(&self, arch: Arch) -> &Sha256Digest {
        &self.artifact(arch).sha256
    }

    pub fn set_checksum(&mut self, arch: Arch, digest: Sha256Digest) {
        self.artifacts.get_mut(arch).sha256 = digest;
    }

    /// Move the manifest to `version`, returning the previous one.
    ///
    /// Explicit artifact URLs have every whole occurrence of the old version
    /// rewritten; URLs derived from `url_template` follow automatically. An
    /// explicit URL without the old version is an error and leaves the
    /// manifest untouched. Checksums are left as they were, so callers must
    /// record new ones before saving.
    pub fn bump(&mut self, version: Version) -> Result<Version, ManifestError> {
        let old_str = self.version.to_string();
        let new_str = version.to_string();
        let mut rewritten = Vec::new();
        for arch in Arch::ALL {
            if let Some(url) = &self.artifact(arch).url {
                let url = replace_version(url, &old_str, &new_str).ok_or_else(|| {
                    ManifestError::UrlWithoutVersion {
                        arch,
                        url: url.clone(),
                        version: self.version.clone(),
                    }
                })?;
                rewritten.push((arch, url));
            }
        }
        for (arch, url) in rewritten {
            self.artifacts.get_mut(arch).url = Some(url);
        }
        Ok(std::mem::replace(&mut self.version, version))
    }
}

/// `[A-Z][A-Za-z0-9_]*`
fn is_ruby_constant(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Replace occurrences of `old` that are whole version tokens, i.e. not
/// touching a digit or `.` on either side. `None` if there are none.
fn replace_version(url: &str, old: &str, new: &str) -> Option<String> {
    let is_part = |c: char| c.is_ascii_digit() || c == '.';
    let mut out = String::with_capacity(url.len());
    let mut last = 0;
    let mut found = false;
    for (i, _) in url.match_indices(old) {
        let end = i + old.len();
        let before = url[..i].chars().next_back();
        let after = url[end..].chars().next();
        if before.is_some_and(is_part) || after.is_some_and(is_part) {
            continue;
        }
        out.push_str(&url[last..i]);
        out.push_str(new);
        last = end;
        found = true;
    }
    if !found {
        return None;
    }
    out.push_str(&url[last..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARM64_SHA: &str =
        "b735c7ff84540daaf8d5d748e80ba524199e8fa2b9110b0fe16b2b8d62c52a7a";
    const AMD64_SHA: &str = "1f0b3f2c6a1d9e4b8c7a6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b9c8d7e6f5a";

    fn sample_toml() -> String {
        format!(
            r#"
name = "gitlike"
desc = "GitLike CLI with Git-like workflow for developers"
homepage = "https://github.com/bigdog156/gitlike"
version = "1.0.2"
url_template = "https://github.com/bigdog156/{{name}}/releases/download/{{tag}}/{{name}}-darwin-{{arch}}"

[artifacts.arm64]
sha256 = "{ARM64_SHA}"

[artifacts.amd64]
sha256 = "{AMD64_SHA}"
"#
        )
    }

    #[test]
    fn parse_sample_manifest() {
        let m = ReleaseManifest::from_toml_str(&sample_toml()).unwrap();
        assert_eq!(m.version, Version::new(1, 0, 2));
        assert_eq!(m.tag(), "v1.0.2");
        assert_eq!(m.binary_name(), "gitlike");
        assert_eq!(m.class_name(), "Gitlike");
        assert_eq!(m.checksum(Arch::Arm64).as_str(), ARM64_SHA);
        assert_eq!(
            m.artifact_url(Arch::Amd64).unwrap(),
            "https://github.com/bigdog156/gitlike/releases/download/v1.0.2/gitlike-darwin-amd64"
        );
        assert_eq!(m.asset_name(Arch::Arm64).unwrap(), "gitlike-darwin-arm64");
    }

    #[test]
    fn missing_arch_is_parse_error() {
        let toml = sample_toml().replace("[artifacts.amd64]", "[artifacts.riscv]");
        assert!(ReleaseManifest::from_toml_str(&toml).is_err());
    }

    #[test]
    fn bad_checksum_is_parse_error() {
        let toml = sample_toml().replace(ARM64_SHA, "deadbeef");
        assert!(ReleaseManifest::from_toml_str(&toml).is_err());
    }

    #[test]
    fn explicit_url_overrides_template() {
        let mut m = ReleaseManifest::from_toml_str(&sample_toml()).unwrap();
        m.artifacts.arm64.url = Some("https://mirror.example.com/gl-arm".to_string());
        assert_eq!(
            m.artifact_url(Arch::Arm64).unwrap(),
            "https://mirror.example.com/gl-arm"
        );
        assert!(m.artifact_url(Arch::Amd64).unwrap().contains("github.com"));
    }

    #[test]
    fn missing_url_and_template() {
        let mut m = ReleaseManifest::from_toml_str(&sample_toml()).unwrap();
        m.url_template = None;
        assert_eq!(m.validate(), Err(ManifestError::MissingUrl(Arch::Arm64)));
    }

    #[test]
    fn duplicate_asset_rejected() {
        let mut m = ReleaseManifest::from_toml_str(&sample_toml()).unwrap();
        m.url_template = Some("https://example.com/{tag}/gitlike".to_string());
        assert_eq!(
            m.validate(),
            Err(ManifestError::DuplicateAsset("gitlike".to_string()))
        );
    }

    #[test]
    fn class_name_from_hyphenated_name() {
        let mut m = ReleaseManifest::from_toml_str(&sample_toml()).unwrap();
        m.name = "git-like_tool".to_string();
        assert_eq!(m.class_name(), "GitLikeTool");
        m.class_name = Some("Gitlike".to_string());
        assert_eq!(m.class_name(), "Gitlike");
    }

    #[test]
    fn invalid_binary_rejected() {
        let mut m = ReleaseManifest::from_toml_str(&sample_toml()).unwrap();
        m.binary = Some("bin/gitlike".to_string());
        assert!(matches!(m.validate(), Err(ManifestError::InvalidBinary(_))));
    }

    #[test]
    fn bump_rewrites_explicit_urls() {
        let mut m = ReleaseManifest::from_toml_str(&sample_toml()).unwrap();
        m.url_template = None;
        m.artifacts.arm64.url = Some(
            "https://github.com/bigdog156/gitlike/releases/download/v1.0.2/gitlike-darwin-arm64"
                .to_string(),
        );
        m.artifacts.amd64.url = Some(
            "https://github.com/bigdog156/gitlike/releases/download/v1.0.2/gitlike-darwin-amd64"
                .to_string(),
        );
        let old = m.bump(Version::new(1, 1, 0)).unwrap();
        assert_eq!(old, Version::new(1, 0, 2));
        assert_eq!(
            m.artifact_url(Arch::Arm64).unwrap(),
            "https://github.com/bigdog156/gitlike/releases/download/v1.1.0/gitlike-darwin-arm64"
        );
    }

    #[test]
    fn bump_only_rewrites_whole_version_tokens() {
        let mut m = ReleaseManifest::from_toml_str(&sample_toml()).unwrap();
        m.version = Version::new(1, 0, 1);
        m.artifacts.arm64.url =
            Some("https://example.com/v11.0.10/1.0.1/gitlike-darwin-arm64".to_string());
        m.artifacts.amd64.url =
            Some("https://example.com/gitlike-1.0.1-darwin-amd64".to_string());
        m.bump(Version::new(1, 0, 2)).unwrap();
        assert_eq!(
            m.artifact_url(Arch::Arm64).unwrap(),
            "https://example.com/v11.0.10/1.0.2/gitlike-darwin-arm64"
        );
        assert_eq!(
            m.artifact_url(Arch::Amd64).unwrap(),
            "https://example.com/gitlike-1.0.2-darwin-amd64"
        );
    }

    #[test]
    fn bump_rejects_url_without_old_version() {
        let mut m = ReleaseManifest::from_toml_str(&sample_toml()).unwrap();
        m.version = Version::new(1, 0, 1);
        m.artifacts.arm64.url =
            Some("https://example.com/v11.0.10/gitlike-darwin-arm64".to_string());
        let before = m.clone();
        let err = m.bump(Version::new(1, 0, 2)).unwrap_err();
        assert!(matches!(err, ManifestError::UrlWithoutVersion { arch: Arch::Arm64, .. }));
        assert_eq!(m, before);
    }

    #[test]
    fn class_name_must_be_ruby_constant() {
        let mut m = ReleaseManifest::from_toml_str(&sample_toml()).unwrap();
        m.name = "1tool".to_string();
        assert_eq!(
            m.validate(),
            Err(ManifestError::InvalidClassName("1tool".to_string()))
        );
        m.name = "gitlike".to_string();
        m.class_name = Some("Git Like".to_string());
        assert!(matches!(m.validate(), Err(ManifestError::InvalidClassName(_))));
        m.class_name = Some("Git_Like2".to_string());
        assert_eq!(m.validate(), Ok(()));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_MANIFEST);
        let m = ReleaseManifest::from_toml_str(&sample_toml()).unwrap();
        m.save(&path).unwrap();
        let loaded = ReleaseManifest::load(&path).unwrap();
        assert_eq!(loaded, m);
    }
}

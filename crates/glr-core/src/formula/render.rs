//! Formula template.

use super::ruby::escape;
use crate::arch::Arch;
use crate::manifest::{ManifestError, ReleaseManifest};
use std::fmt::Write;

/// Render the formula for `manifest`. Always ends with a newline.
pub fn render(manifest: &ReleaseManifest) -> Result<String, ManifestError> {
    manifest.validate()?;

    let binary = escape(manifest.binary_name());
    let version = escape(&manifest.version.to_string());
    let arm_url = escape(&manifest.artifact_url(Arch::Arm64)?);
    let amd_url = escape(&manifest.artifact_url(Arch::Amd64)?);
    let arm_asset = escape(&manifest.asset_name(Arch::Arm64)?);
    let amd_asset = escape(&manifest.asset_name(Arch::Amd64)?);

    let mut out = String::with_capacity(1024);
    // Writing to a String cannot fail.
    let _ = write!(
        out,
        r##"class {class} < Formula
  desc "{desc}"
  homepage "{homepage}"
  version "{version}"

  if Hardware::CPU.arm?
    url "{arm_url}"
    sha256 "{arm_sha}"
  else
    url "{amd_url}"
    sha256 "{amd_sha}"
  end

  def install
    bin.install "{arm_asset}" => "{binary}" if Hardware::CPU.arm?
    bin.install "{amd_asset}" => "{binary}" if Hardware::CPU.intel?
  end

  test do
    system "#{{bin}}/{binary}", "--help"
    assert_match "{version}", shell_output("#{{bin}}/{binary} --version 2>&1")
  end
end
"##,
        class = manifest.class_name(),
        desc = escape(&manifest.desc),
        homepage = escape(&manifest.homepage),
        arm_sha = manifest.checksum(Arch::Arm64),
        amd_sha = manifest.checksum(Arch::Amd64),
    );
    Ok(out)
}

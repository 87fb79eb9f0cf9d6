//! Homebrew formula generation from a release manifest.
//!
//! The formula has a fixed shape: metadata, an ARM/Intel branch selecting
//! `url` + `sha256`, an install block copying the staged asset to the binary
//! name, and a smoke test. Only the manifest's values vary between releases.

mod drift;
mod parse;
mod render;
mod ruby;

pub use drift::{check_drift, Drift};
pub use parse::{parse, FormulaParseError};
pub use render::render;

#[cfg(test)]
pub(crate) mod tests {
    /// The 1.0.0 formula as published, including the stray indentation on
    /// the blank line after `version`.
    pub(crate) const GITLIKE_1_0_0: &str = concat!(
        "class Gitlike < Formula\n",
        "  desc \"GitLike CLI with Git-like workflow for developers\"\n",
        "  homepage \"https://github.com/bigdog156/gitlike\"\n",
        "  version \"1.0.0\"\n",
        "  \n",
        "  if Hardware::CPU.arm?\n",
        "    url \"https://github.com/bigdog156/gitlike/releases/download/v1.0.0/gitlike-darwin-arm64\"\n",
        "    sha256 \"7e4f3228da3555c21f11fc73b96f13e9ec9c7f1fcb42c7c3c418c0875250e196\"\n",
        "  else\n",
        "    url \"https://github.com/bigdog156/gitlike/releases/download/v1.0.0/gitlike-darwin-amd64\"\n",
        "    sha256 \"2509406fc062c00782b5a292eb104d2d321e4b638984b52fc9d5adb69f5d57f9\"\n",
        "  end\n",
        "\n",
        "  def install\n",
        "    bin.install \"gitlike-darwin-arm64\" => \"gitlike\" if Hardware::CPU.arm?\n",
        "    bin.install \"gitlike-darwin-amd64\" => \"gitlike\" if Hardware::CPU.intel?\n",
        "  end\n",
        "\n",
        "  test do\n",
        "    system \"#{bin}/gitlike\", \"--help\"\n",
        "    assert_match \"1.0.0\", shell_output(\"#{bin}/gitlike --version 2>&1\")\n",
        "  end\n",
        "end\n",
    );
}

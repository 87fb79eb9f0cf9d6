//! Target CPU architectures for prebuilt artifacts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Architecture of a prebuilt artifact. Only macOS ARM64 and Intel builds are published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Arm64,
    Amd64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArchError {
    #[error("unknown architecture '{0}' (expected arm64 or amd64)")]
    Unknown(String),
    #[error("unsupported host architecture '{0}'; pass --arch to choose an artifact")]
    UnsupportedHost(String),
}

impl Arch {
    /// Formula order: the ARM branch comes first, everything else falls to Intel.
    pub const ALL: [Arch; 2] = [Arch::Arm64, Arch::Amd64];

    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::Amd64 => "amd64",
        }
    }

    /// Architecture of the running process.
    pub fn host() -> Result<Arch, ArchError> {
        Self::from_target(std::env::consts::ARCH)
    }

    fn from_target(target_arch: &str) -> Result<Arch, ArchError> {
        match target_arch {
            "aarch64" => Ok(Arch::Arm64),
            "x86_64" => Ok(Arch::Amd64),
            other => Err(ArchError::UnsupportedHost(other.to_string())),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arm64" | "aarch64" | "arm" => Ok(Arch::Arm64),
            "amd64" | "x86_64" | "x64" | "intel" => Ok(Arch::Amd64),
            _ => Err(ArchError::Unknown(s.to_string())),
        }
    }
}

//! CLI for glr, the gitlike release tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use glr_core::arch::Arch;
use glr_core::config;
use glr_core::manifest::DEFAULT_MANIFEST;
use std::path::PathBuf;

use commands::{
    run_bump, run_check, run_checksum, run_completions, run_import, run_install, run_man,
    run_probe, run_render, run_smoke, run_verify, InstallArgs,
};

/// Top-level CLI for glr.
#[derive(Debug, Parser)]
#[command(name = "glr", version)]
#[command(
    about = "glr: render, verify and smoke-test the gitlike Homebrew formula from one release manifest",
    long_about = None
)]
pub struct Cli {
    /// Release manifest to read (and update, for `bump`/`import`).
    #[arg(long, global = true, default_value = DEFAULT_MANIFEST, value_name = "PATH")]
    pub manifest: PathBuf,

    /// Config file to use instead of ~/.config/glr/config.toml (created if missing).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Render the formula from the manifest.
    Render {
        /// Write to this file instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Fail if a committed formula no longer matches the manifest.
    Check {
        /// Path to the committed formula (e.g. Formula/gitlike.rb).
        formula: PathBuf,
    },

    /// Create a manifest from an existing hand-written formula.
    Import {
        /// Path to the formula to read.
        formula: PathBuf,

        /// Manifest to write (defaults to --manifest).
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Overwrite an existing manifest.
        #[arg(long)]
        force: bool,
    },

    /// Cut a release: set a new version and record its checksums.
    Bump {
        /// New version, e.g. 1.0.2 (a leading `v` is accepted).
        version: String,

        /// Checksum for one architecture; repeat for each.
        #[arg(long = "sha256", value_name = "ARCH=HEX")]
        sha256: Vec<String>,

        /// Download artifacts without a --sha256 and record their digests.
        #[arg(long)]
        fetch: bool,
    },

    /// Compute SHA-256 of a file (e.g. a freshly built artifact).
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Send a HEAD request to every artifact URL.
    Probe {
        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Download artifacts and check them against the manifest checksums.
    Verify {
        /// Only verify this architecture (arm64 or amd64).
        #[arg(long)]
        arch: Option<Arch>,

        /// Print reports as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Install the artifact for this machine into <PREFIX>/bin, then smoke-test it.
    Install {
        /// Install prefix (defaults to install_prefix from config).
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<PathBuf>,

        /// Artifact architecture (defaults to the host's).
        #[arg(long)]
        arch: Option<Arch>,

        /// Install this local file instead of downloading (checksum still enforced).
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,

        /// Skip the post-install smoke test.
        #[arg(long)]
        skip_smoke: bool,
    },

    /// Check that a binary answers --help and reports the expected version.
    Smoke {
        /// Path to the installed binary.
        binary: PathBuf,

        /// Version the binary must report (defaults to the manifest version).
        #[arg(long, value_name = "VERSION")]
        expect_version: Option<String>,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_or_init_at(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        let manifest = cli.manifest.as_path();

        match cli.command {
            CliCommand::Render { output } => run_render(manifest, output.as_deref())?,
            CliCommand::Check { formula } => run_check(manifest, &formula)?,
            CliCommand::Import {
                formula,
                output,
                force,
            } => run_import(&formula, output.as_deref().unwrap_or(manifest), force)?,
            CliCommand::Bump {
                version,
                sha256,
                fetch,
            } => run_bump(manifest, &cfg, &version, &sha256, fetch).await?,
            CliCommand::Checksum { path } => run_checksum(&path).await?,
            CliCommand::Probe { json } => run_probe(manifest, &cfg, json).await?,
            CliCommand::Verify { arch, json } => run_verify(manifest, &cfg, arch, json).await?,
            CliCommand::Install {
                prefix,
                arch,
                from,
                skip_smoke,
            } => {
                let args = InstallArgs {
                    prefix,
                    arch,
                    from,
                    skip_smoke,
                };
                run_install(manifest, &cfg, args).await?
            }
            CliCommand::Smoke {
                binary,
                expect_version,
            } => run_smoke(manifest, &cfg, &binary, expect_version).await?,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

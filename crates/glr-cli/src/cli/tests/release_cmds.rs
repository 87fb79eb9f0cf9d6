//! Tests for checksum, probe, verify, install, smoke, completions and man.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use glr_core::arch::Arch;
use std::path::Path;

#[test]
fn cli_parse_checksum() {
    match parse(&["glr", "checksum", "/path/to/gitlike-darwin-arm64"]) {
        CliCommand::Checksum { path } => assert_eq!(path, "/path/to/gitlike-darwin-arm64"),
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_probe() {
    match parse(&["glr", "probe", "--json"]) {
        CliCommand::Probe { json } => assert!(json),
        _ => panic!("expected Probe"),
    }
}

#[test]
fn cli_parse_verify() {
    match parse(&["glr", "verify"]) {
        CliCommand::Verify { arch, json } => {
            assert!(arch.is_none());
            assert!(!json);
        }
        _ => panic!("expected Verify"),
    }
}

#[test]
fn cli_parse_verify_arch_alias() {
    match parse(&["glr", "verify", "--arch", "x86_64"]) {
        CliCommand::Verify { arch, .. } => assert_eq!(arch, Some(Arch::Amd64)),
        _ => panic!("expected Verify with --arch"),
    }
}

#[test]
fn cli_verify_rejects_unknown_arch() {
    assert!(Cli::try_parse_from(["glr", "verify", "--arch", "sparc"]).is_err());
}

#[test]
fn cli_parse_install_defaults() {
    match parse(&["glr", "install"]) {
        CliCommand::Install {
            prefix,
            arch,
            from,
            skip_smoke,
        } => {
            assert!(prefix.is_none());
            assert!(arch.is_none());
            assert!(from.is_none());
            assert!(!skip_smoke);
        }
        _ => panic!("expected Install"),
    }
}

#[test]
fn cli_parse_install_all_flags() {
    match parse(&[
        "glr",
        "install",
        "--prefix",
        "/opt/homebrew",
        "--arch",
        "arm64",
        "--from",
        "dist/gitlike-darwin-arm64",
        "--skip-smoke",
    ]) {
        CliCommand::Install {
            prefix,
            arch,
            from,
            skip_smoke,
        } => {
            assert_eq!(prefix.as_deref(), Some(Path::new("/opt/homebrew")));
            assert_eq!(arch, Some(Arch::Arm64));
            assert_eq!(from.as_deref(), Some(Path::new("dist/gitlike-darwin-arm64")));
            assert!(skip_smoke);
        }
        _ => panic!("expected Install with flags"),
    }
}

#[test]
fn cli_parse_smoke() {
    match parse(&["glr", "smoke", "/opt/homebrew/bin/gitlike", "--expect-version", "1.0.2"]) {
        CliCommand::Smoke {
            binary,
            expect_version,
        } => {
            assert_eq!(binary, Path::new("/opt/homebrew/bin/gitlike"));
            assert_eq!(expect_version.as_deref(), Some("1.0.2"));
        }
        _ => panic!("expected Smoke"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["glr", "completions", "zsh"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Zsh),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_man() {
    assert!(matches!(parse(&["glr", "man"]), CliCommand::Man));
}

#[test]
fn cli_version_flag_is_handled_by_clap() {
    let err = Cli::try_parse_from(["glr", "--version"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    let err = Cli::try_parse_from(["glr", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

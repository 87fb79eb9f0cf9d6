//! Post-install smoke test: the binary answers `--help` and reports the
//! expected version from `--version`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Minimum time given to pipe readers after the child exits.
const DRAIN_GRACE: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("binary not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("binary path is not a file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("binary is not executable: {}", .0.display())]
    NotExecutable(PathBuf),
    #[error("failed to run {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("waiting for `{arg}` failed: {source}")]
    Wait {
        arg: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("`{arg}` did not finish within {timeout:?}")]
    TimedOut {
        arg: &'static str,
        timeout: Duration,
    },
    #[error("`{arg}` exited with {status}\n{output}")]
    Failed {
        arg: &'static str,
        status: ExitStatus,
        output: String,
    },
    #[error("`--version` output does not contain \"{expected}\":\n{output}")]
    VersionMismatch { expected: String, output: String },
}

#[derive(Debug, Clone)]
pub struct SmokeReport {
    /// First non-empty line of `--version` output.
    pub version_line: String,
    /// Combined stdout+stderr of `--version`.
    pub version_output: String,
}

/// Combined stdout then stderr of one invocation.
struct Invocation {
    status: ExitStatus,
    output: String,
}

fn check_binary(binary: &Path) -> Result<(), SmokeError> {
    if !binary.exists() {
        return Err(SmokeError::NotFound(binary.to_path_buf()));
    }
    if !binary.is_file() {
        return Err(SmokeError::NotAFile(binary.to_path_buf()));
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = binary
            .metadata()
            .map_err(|source| SmokeError::Spawn {
                path: binary.to_path_buf(),
                source,
            })?
            .permissions()
            .mode();
        if mode & 0o111 == 0 {
            return Err(SmokeError::NotExecutable(binary.to_path_buf()));
        }
    }
    Ok(())
}

/// Output read so far from one child pipe, plus a signal for EOF.
struct Drain {
    buf: Arc<Mutex<Vec<u8>>>,
    eof: mpsc::Receiver<()>,
}

impl Drain {
    fn start<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (tx, eof) = mpsc::channel();
        let sink = Arc::clone(&buf);
        thread::spawn(move || {
            if let Some(mut p) = pipe {
                let mut chunk = [0u8; 4096];
                while let Ok(n) = p.read(&mut chunk) {
                    if n == 0 {
                        break;
                    }
                    if let Ok(mut b) = sink.lock() {
                        b.extend_from_slice(&chunk[..n]);
                    }
                }
            }
            let _ = tx.send(());
        });
        Drain { buf, eof }
    }

    /// Wait for EOF until `deadline`, then take whatever has been read. A
    /// background process that inherited the pipe can keep it open forever.
    fn finish(self, deadline: Instant) -> (Vec<u8>, bool) {
        let wait = deadline.saturating_duration_since(Instant::now());
        let complete = self.eof.recv_timeout(wait).is_ok();
        let bytes = self
            .buf
            .lock()
            .map(|mut b| std::mem::take(&mut *b))
            .unwrap_or_default();
        (bytes, complete)
    }
}

/// Run `binary arg`, killing it after `timeout`. Pipes are drained on helper
/// threads so a chatty binary cannot block on a full pipe.
fn invoke(binary: &Path, arg: &'static str, timeout: Duration) -> Result<Invocation, SmokeError> {
    let mut child = Command::new(binary)
        .arg(arg)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| SmokeError::Spawn {
            path: binary.to_path_buf(),
            source,
        })?;

    let out = Drain::start(child.stdout.take());
    let err = Drain::start(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                tracing::warn!("{} {} timed out after {:?}", binary.display(), arg, timeout);
                return Err(SmokeError::TimedOut { arg, timeout });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => return Err(SmokeError::Wait { arg, source }),
        }
    };

    let drain_deadline = deadline.max(Instant::now() + DRAIN_GRACE);
    let (out, out_complete) = out.finish(drain_deadline);
    let (err, err_complete) = err.finish(drain_deadline);
    if !(out_complete && err_complete) {
        tracing::warn!(
            "{} {} exited but its output is still held open; using what was read",
            binary.display(),
            arg
        );
    }
    let mut output = String::from_utf8_lossy(&out).into_owned();
    output.push_str(&String::from_utf8_lossy(&err));
    tracing::debug!("{} {} -> {}", binary.display(), arg, status);
    Ok(Invocation { status, output })
}

fn invoke_ok(binary: &Path, arg: &'static str, timeout: Duration) -> Result<String, SmokeError> {
    let inv = invoke(binary, arg, timeout)?;
    if !inv.status.success() {
        return Err(SmokeError::Failed {
            arg,
            status: inv.status,
            output: inv.output,
        });
    }
    Ok(inv.output)
}

/// Run the smoke test against an installed binary.
pub fn smoke_test(
    binary: &Path,
    expected_version: &str,
    timeout: Duration,
) -> Result<SmokeReport, SmokeError> {
    check_binary(binary)?;

    invoke_ok(binary, "--help", timeout)?;

    let output = invoke_ok(binary, "--version", timeout)?;
    if !output.contains(expected_version) {
        return Err(SmokeError::VersionMismatch {
            expected: expected_version.to_string(),
            output,
        });
    }

    let version_line = output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string();
    tracing::info!("smoke test passed for {}: {}", binary.display(), version_line);
    Ok(SmokeReport {
        version_line,
        version_output: output,
    })
}

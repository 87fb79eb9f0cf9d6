//! Artifact transport over HTTP (libcurl).
//!
//! A release artifact is a single prebuilt binary, so downloads are one
//! sequential GET written straight to a local file. Callers hash the file
//! afterwards (see [`crate::checksum`]).

mod head;

pub use head::{probe, probe_with_retry, HeadResult};

use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str;
use std::time::Duration;

/// Transfer knobs taken from config.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Upper bound for a whole transfer.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(600),
            user_agent: format!("glr/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub(crate) fn apply_options(
    easy: &mut curl::easy::Easy,
    opts: &FetchOptions,
) -> Result<(), curl::Error> {
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    easy.useragent(&opts.user_agent)?;
    Ok(())
}

/// Downloads `url` with a single GET, writing the body to `dest` (truncated first).
/// Returns the number of bytes written.
pub fn download_to(url: &str, dest: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    let mut file = File::create(dest)?;
    let mut written: u64 = 0;
    let mut write_err: Option<std::io::Error> = None;
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    apply_options(&mut easy, opts)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                tracing::warn!("artifact write failed: {}", e);
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_err.take() {
        return Err(FetchError::Io(e));
    }
    performed?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }

    file.flush()?;
    file.sync_all()?;

    if let Some(expected) = head::parse_headers(&headers).content_length {
        if written != expected {
            return Err(FetchError::PartialTransfer {
                expected,
                received: written,
            });
        }
    }

    tracing::debug!("downloaded {} bytes from {} to {}", written, url, dest.display());
    Ok(written)
}

/// [`download_to`] wrapped in the retry policy. Each attempt restarts from byte 0.
pub fn download_with_retry(
    url: &str,
    dest: &Path,
    opts: &FetchOptions,
    policy: &RetryPolicy,
) -> Result<u64, FetchError> {
    run_with_retry(policy, || download_to(url, dest, opts))
}

//! HTTP HEAD probing for artifact URLs.
//!
//! Confirms that an artifact URL resolves (after redirects) and captures
//! `Content-Length`, `ETag` and `Last-Modified` for the `probe` report.

use super::{apply_options, FetchOptions};
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use serde::Serialize;
use std::str;

/// Result of a HEAD request against the final (post-redirect) location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadResult {
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// `ETag` value if present, quotes stripped.
    pub etag: Option<String>,
    /// `Last-Modified` value if present.
    pub last_modified: Option<String>,
}

/// Performs a HEAD request and returns parsed metadata.
///
/// Follows redirects. Runs in the current thread; call from `spawn_blocking`
/// if used from async code.
pub fn probe(url: &str, opts: &FetchOptions) -> Result<HeadResult, FetchError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?;
    apply_options(&mut easy, opts)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }

    Ok(parse_headers(&headers))
}

/// [`probe`] wrapped in the retry policy.
pub fn probe_with_retry(
    url: &str,
    opts: &FetchOptions,
    policy: &RetryPolicy,
) -> Result<HeadResult, FetchError> {
    run_with_retry(policy, || probe(url, opts))
}

/// Parse collected header lines into HeadResult. Each status line starts a
/// new response, so only the headers of the last hop in a redirect chain count.
pub(crate) fn parse_headers(lines: &[String]) -> HeadResult {
    let mut result = HeadResult::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            result = HeadResult::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                result.content_length = value.parse::<u64>().ok();
            } else if name.eq_ignore_ascii_case("etag") {
                result.etag = Some(value.trim_matches('"').to_string());
            } else if name.eq_ignore_ascii_case("last-modified") {
                result.last_modified = Some(value.to_string());
            }
        }
    }

    result
}

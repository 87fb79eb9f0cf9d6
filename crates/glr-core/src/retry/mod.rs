//! Retries for artifact transfers.
//!
//! Probe, verify and install all go through [`run_with_retry`], so one
//! `[retry]` config section governs every request to the release host.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;

//! Map transfer failures onto [`ErrorKind`].

use super::error::FetchError;
use super::policy::ErrorKind;

pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        ErrorKind::Timeout
    } else if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        ErrorKind::Connection
    } else {
        ErrorKind::Other
    }
}

/// A short body counts as a dropped connection. Local I/O errors (disk
/// full, unwritable prefix) never get better on retry.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http(code) => classify_http_status(*code),
        FetchError::PartialTransfer { .. } => ErrorKind::Connection,
        FetchError::Io(_) => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_host_statuses() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
        assert_eq!(classify_http_status(502), ErrorKind::Http5xx(502));
        // Missing release asset or private repo.
        assert_eq!(classify_http_status(404), ErrorKind::Other);
        assert_eq!(classify_http_status(403), ErrorKind::Other);
    }

    #[test]
    fn curl_timeout_and_connect_failures() {
        // CURLE_COULDNT_CONNECT = 7, CURLE_OPERATION_TIMEDOUT = 28, CURLE_URL_MALFORMAT = 3
        assert_eq!(classify_curl_error(&curl::Error::new(28)), ErrorKind::Timeout);
        assert_eq!(classify_curl_error(&curl::Error::new(7)), ErrorKind::Connection);
        assert_eq!(classify_curl_error(&curl::Error::new(3)), ErrorKind::Other);
    }

    #[test]
    fn short_body_retried_local_io_not() {
        let partial = FetchError::PartialTransfer {
            expected: 10,
            received: 4,
        };
        assert_eq!(classify(&partial), ErrorKind::Connection);
        let io = FetchError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(classify(&io), ErrorKind::Other);
        assert_eq!(classify(&FetchError::Http(404)), ErrorKind::Other);
    }
}

//! URL helpers for artifact locations.

mod path;

pub use path::filename_from_url_path;

/// True if `url` parses and uses an http(s) scheme with a host.
pub fn is_http_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}

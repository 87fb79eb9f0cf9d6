/// Release asset name: the last segment of the URL path, as a package
/// manager would stage the download and as `bin.install` refers to it.
///
/// `None` when the URL does not parse, has no path, or ends in `/` (a
/// directory listing is not an asset).
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let name = parsed.path_segments()?.last()?;
    match name {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_release_asset() {
        assert_eq!(
            filename_from_url_path(
                "https://github.com/bigdog156/gitlike/releases/download/v1.0.2/gitlike-darwin-arm64"
            )
            .as_deref(),
            Some("gitlike-darwin-arm64")
        );
    }

    #[test]
    fn query_and_fragment_ignored() {
        assert_eq!(
            filename_from_url_path("https://cdn.example.com/gitlike-darwin-amd64?token=abc#x")
                .as_deref(),
            Some("gitlike-darwin-amd64")
        );
    }

    #[test]
    fn no_asset_name() {
        assert_eq!(filename_from_url_path("https://example.com/"), None);
        assert_eq!(filename_from_url_path("https://example.com"), None);
        assert_eq!(filename_from_url_path("https://example.com/releases/"), None);
        assert_eq!(filename_from_url_path("not a url"), None);
    }
}

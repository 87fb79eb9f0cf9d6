//! `{placeholder}` expansion for artifact URL templates.

use super::ManifestError;

/// Values substituted into a URL template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub tag: &'a str,
    pub arch: &'a str,
}

impl TemplateVars<'_> {
    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "name" => Some(self.name),
            "version" => Some(self.version),
            "tag" => Some(self.tag),
            "arch" => Some(self.arch),
            _ => None,
        }
    }
}

/// Expand `{name}`, `{version}`, `{tag}` and `{arch}` in `template`.
/// Unknown or unterminated placeholders are errors, never passed through.
pub fn expand(template: &str, vars: &TemplateVars<'_>) -> Result<String, ManifestError> {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| ManifestError::UnclosedPlaceholder(template.to_string()))?;
        let key = &after[..close];
        let value = vars
            .lookup(key)
            .ok_or_else(|| ManifestError::UnknownPlaceholder(key.to_string()))?;
        out.push_str(value);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: TemplateVars<'static> = TemplateVars {
        name: "gitlike",
        version: "1.0.2",
        tag: "v1.0.2",
        arch: "arm64",
    };

    #[test]
    fn expands_release_url() {
        let url = expand(
            "https://github.com/bigdog156/{name}/releases/download/{tag}/{name}-darwin-{arch}",
            &VARS,
        )
        .unwrap();
        assert_eq!(
            url,
            "https://github.com/bigdog156/gitlike/releases/download/v1.0.2/gitlike-darwin-arm64"
        );
    }

    #[test]
    fn no_placeholders_is_identity() {
        assert_eq!(expand("https://example.com/x", &VARS).unwrap(), "https://example.com/x");
    }

    #[test]
    fn unknown_placeholder_rejected() {
        let err = expand("https://example.com/{os}", &VARS).unwrap_err();
        assert_eq!(err, ManifestError::UnknownPlaceholder("os".to_string()));
    }

    #[test]
    fn unclosed_placeholder_rejected() {
        assert!(matches!(
            expand("https://example.com/{arch", &VARS),
            Err(ManifestError::UnclosedPlaceholder(_))
        ));
    }
}

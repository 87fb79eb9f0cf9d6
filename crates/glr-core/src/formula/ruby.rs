//! Ruby double-quoted string literals.

/// Escape `s` for a single-line Ruby `"..."` literal. Covers backslash,
/// quote, `#{` interpolation and the `\n`, `\t`, `\r` control characters.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '#' if matches!(chars.peek(), Some('{' | '$' | '@')) => out.push_str("\\#"),
            _ => out.push(c),
        }
    }
    out
}

/// Read one `"..."` literal from the start of `s` (leading whitespace allowed).
/// Returns the unescaped value and the remainder after the closing quote.
pub(crate) fn read_string(s: &str) -> Option<(String, &str)> {
    let s = s.trim_start();
    let body = s.strip_prefix('"')?;
    let mut out = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((out, &body[i + 1..])),
            '\\' => {
                let (_, next) = chars.next()?;
                match next {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    other => out.push(other),
                }
            }
            _ => out.push(c),
        }
    }
    None
}

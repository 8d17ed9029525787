//! Header-definition file: one `Key: value` per line.
//!
//! A line without a value (no colon, or nothing after it) takes the whole
//! next line as its value, which allows long values such as cookies to sit
//! on their own line.

use anyhow::{Context, Result};
use std::path::Path;

/// Ordered request headers.
pub type Headers = Vec<(String, String)>;

pub fn parse_headers(text: &str) -> Headers {
    let mut headers = Headers::new();
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    while let Some(line) = lines.next() {
        let (key, value) = match line.split_once(':') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (line, ""),
        };
        if key.is_empty() {
            tracing::warn!(line, "header line without a name, skipped");
            continue;
        }
        let value = if value.is_empty() {
            match lines.next() {
                Some(next) => next,
                None => {
                    tracing::warn!(key, "header without a value at end of file, skipped");
                    continue;
                }
            }
        } else {
            value
        };
        headers.push((key.to_string(), value.to_string()));
    }
    headers
}

pub fn parse_header_file(path: &Path) -> Result<Headers> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read header file: {}", path.display()))?;
    let headers = parse_headers(&text);
    tracing::debug!(count = headers.len(), path = %path.display(), "loaded request headers");
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(h: &Headers) -> Vec<(&str, &str)> {
        h.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn simple_lines() {
        let h = parse_headers("User-Agent: hlsarc/0.1\nReferer:  https://h/page \n");
        assert_eq!(
            pairs(&h),
            [("User-Agent", "hlsarc/0.1"), ("Referer", "https://h/page")]
        );
    }

    #[test]
    fn value_on_following_line() {
        let h = parse_headers("Cookie:\na=1; b=2: c\nAccept: */*\n");
        assert_eq!(pairs(&h), [("Cookie", "a=1; b=2: c"), ("Accept", "*/*")]);
    }

    #[test]
    fn name_without_colon_takes_next_line() {
        let h = parse_headers("Authorization\n\nBearer abc\n");
        assert_eq!(pairs(&h), [("Authorization", "Bearer abc")]);
    }

    #[test]
    fn dangling_name_is_dropped() {
        let h = parse_headers("Accept: */*\nCookie:");
        assert_eq!(pairs(&h), [("Accept", "*/*")]);
    }

    #[test]
    fn value_keeps_inner_colons() {
        let h = parse_headers("Origin: https://h:8443\r\n");
        assert_eq!(pairs(&h), [("Origin", "https://h:8443")]);
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headers.txt");
        std::fs::write(&path, "X-Token: t\n").unwrap();
        assert_eq!(parse_header_file(&path).unwrap().len(), 1);
        assert!(parse_header_file(&dir.path().join("none.txt")).is_err());
    }
}

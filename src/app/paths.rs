//! URL to storage path mapping
//!
//! Pure, deterministic derivation of a filesystem-safe relative path from a
//! URL and a content type. The host's dot-separated labels are reversed into
//! leading directories (`foo.example.com/a` becomes `com/example/foo/a`), the
//! URL path and query follow, reserved characters are translated, and the
//! trailing extension is reconciled with the content type so that the same URL
//! maps to the same path on every run.

use std::path::Path;

use url::Url;

use crate::constants::{files, http};

/// Translates filesystem-hostile characters to safe substitutes
///
/// A literal `.` becomes a directory separator so that dots in the host or
/// path never collide with an intended file extension; the trailing extension
/// itself is exempted by the caller.
fn normalize_component(component: &str) -> String {
    component
        .chars()
        .map(|c| match c {
            ':' | '\\' | '*' | '?' | '<' | '>' | '|' => '-',
            '"' => '\'',
            '\0' => '0',
            '.' => '/',
            other => other,
        })
        .collect()
}

/// Splits a trailing extension (with its leading dot) off the final path
/// segment, if one exists
///
/// A leading dot in the segment does not count as an extension separator, so
/// `a/.hidden` has no extension.
fn split_extension(s: &str) -> (&str, Option<&str>) {
    let segment_start = s.rfind('/').map(|i| i + 1).unwrap_or(0);
    let segment = &s[segment_start..];
    match segment.rfind('.') {
        Some(i) if i > 0 => {
            let dot = segment_start + i;
            (&s[..dot], Some(&s[dot..]))
        }
        _ => (s, None),
    }
}

/// The extension conventionally associated with a content type, if any
fn canonical_extension(content_type: &str) -> Option<&'static str> {
    mime_guess::get_mime_extensions_str(content_type)
        .and_then(|exts| exts.first())
        .copied()
}

/// Whether an extension (without its dot) is acceptable for a content type
fn extension_matches(content_type: &str, extension: &str) -> bool {
    mime_guess::get_mime_extensions_str(content_type)
        .map(|exts| exts.contains(&extension))
        .unwrap_or(false)
}

/// Guesses the content type a server will return for a URL from its apparent
/// extension, defaulting to HTML
pub fn guess_content_type(url: &Url) -> String {
    mime_guess::from_path(Path::new(url.path()))
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| http::DEFAULT_EXPECTED_CONTENT_TYPE.to_string())
}

/// Strips any parameters (such as a charset) from a Content-Type header value
pub fn strip_content_type_params(header: &str) -> &str {
    header.split(';').next().unwrap_or(header).trim()
}

/// Maps a URL and content type to a relative storage path
///
/// Deterministic and side-effect free: callers re-derive the path with the
/// response's authoritative content type after the fetch and compare against
/// the guessed one.
pub fn url_to_filename(url: &Url, content_type: &str) -> String {
    // Reverse the host labels into directory segments. An explicit port stays
    // attached to its label, as in `example.com:8080` -> `com-8080/example`.
    let netloc = match url.port() {
        Some(port) => format!("{}:{}", url.host_str().unwrap_or(""), port),
        None => url.host_str().unwrap_or("").to_string(),
    };
    let host_dirs = netloc.split('.').rev().collect::<Vec<_>>().join("/");

    let mut stripped = host_dirs;
    stripped.push_str(url.path());
    if let Some(query) = url.query() {
        stripped.push_str(query);
    }

    let (base, existing_ext) = split_extension(&stripped);
    let mut filename = normalize_component(base);
    if filename.ends_with('/') {
        filename.pop();
    }

    match existing_ext {
        Some(ext) => {
            let ext_no_dot = &ext[1..];
            if extension_matches(content_type, ext_no_dot) {
                // The URL's own extension is conventional for the content type
                format!("{}{}", filename, ext)
            } else if let Some(canonical) = canonical_extension(content_type) {
                format!("{}.{}", filename, canonical)
            } else {
                // Unknown content type: keep the original extension, normalized
                format!("{}.{}", filename, normalize_component(ext_no_dot))
            }
        }
        None => match canonical_extension(content_type) {
            Some(canonical) => format!("{}.{}", filename, canonical),
            None => format!("{}.{}", filename, files::FALLBACK_EXTENSION),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html_ext() -> &'static str {
        canonical_extension("text/html").unwrap()
    }

    #[test]
    fn test_host_labels_reversed_into_directories() {
        let url = Url::parse("http://foo.example.com/a/b.html").unwrap();
        let path = url_to_filename(&url, "text/html");
        assert_eq!(path, "com/example/foo/a/b.html");
    }

    #[test]
    fn test_acceptable_extension_kept() {
        // "htm" is also conventional for text/html and must not be rewritten
        let url = Url::parse("http://example.com/page.htm").unwrap();
        let path = url_to_filename(&url, "text/html");
        assert_eq!(path, "com/example/page.htm");
    }

    #[test]
    fn test_mismatched_extension_replaced_by_canonical() {
        let url = Url::parse("http://example.com/data.bin").unwrap();
        let path = url_to_filename(&url, "application/json");
        assert_eq!(path, "com/example/data.json");
    }

    #[test]
    fn test_no_extension_gets_canonical_for_content_type() {
        let url = Url::parse("http://example.com/page").unwrap();
        let path = url_to_filename(&url, "text/html");
        assert_eq!(path, format!("com/example/page.{}", html_ext()));
    }

    #[test]
    fn test_unknown_content_type_keeps_normalized_extension() {
        let url = Url::parse("http://example.com/file.weird").unwrap();
        let path = url_to_filename(&url, "application/x-no-such-type");
        assert_eq!(path, "com/example/file.weird");
    }

    #[test]
    fn test_unknown_content_type_without_extension_falls_back_to_html() {
        let url = Url::parse("http://example.com/file").unwrap();
        let path = url_to_filename(&url, "application/x-no-such-type");
        assert_eq!(path, "com/example/file.html");
    }

    #[test]
    fn test_dots_in_path_become_directory_separators() {
        let url = Url::parse("http://example.com/a.b.c/d").unwrap();
        let path = url_to_filename(&url, "text/html");
        assert_eq!(path, format!("com/example/a/b/c/d.{}", html_ext()));
    }

    #[test]
    fn test_hostile_characters_translated() {
        let url = Url::parse("http://example.com/a:b*c").unwrap();
        let path = url_to_filename(&url, "text/html");
        assert_eq!(path, format!("com/example/a-b-c.{}", html_ext()));
    }

    #[test]
    fn test_query_appended_to_path() {
        let url = Url::parse("http://example.com/search?q=rust").unwrap();
        let path = url_to_filename(&url, "text/html");
        assert_eq!(path, format!("com/example/searchq=rust.{}", html_ext()));
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let url = Url::parse("http://example.com/a/").unwrap();
        let path = url_to_filename(&url, "text/html");
        assert_eq!(path, format!("com/example/a.{}", html_ext()));
    }

    #[test]
    fn test_explicit_port_kept_with_its_label() {
        let url = Url::parse("http://example.com:8080/x").unwrap();
        let path = url_to_filename(&url, "text/html");
        assert_eq!(path, format!("com-8080/example/x.{}", html_ext()));
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let url = Url::parse("http://example.com/a/b?c=d").unwrap();
        let first = url_to_filename(&url, "text/html");
        let second = url_to_filename(&url, "text/html");
        assert_eq!(first, second);
    }

    #[test]
    fn test_guess_content_type_from_extension() {
        let url = Url::parse("http://example.com/data.json").unwrap();
        assert_eq!(guess_content_type(&url), "application/json");

        let url = Url::parse("http://example.com/page.html").unwrap();
        assert_eq!(guess_content_type(&url), "text/html");
    }

    #[test]
    fn test_guess_content_type_defaults_to_html() {
        let url = Url::parse("http://example.com/no-extension").unwrap();
        assert_eq!(guess_content_type(&url), "text/html");
    }

    #[test]
    fn test_strip_content_type_params() {
        assert_eq!(
            strip_content_type_params("text/html; charset=UTF-8"),
            "text/html"
        );
        assert_eq!(strip_content_type_params("application/json"), "application/json");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("a/b.html"), ("a/b", Some(".html")));
        assert_eq!(split_extension("a.b/c"), ("a.b/c", None));
        assert_eq!(split_extension("a/.hidden"), ("a/.hidden", None));
        assert_eq!(split_extension("plain"), ("plain", None));
    }
}

//! Album URL validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::OperationError;

/// Accepted album URLs. Capture 3 is the album id; any path, query or
/// fragment after it is ignored.
static ALBUM_URL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?(m\.)?imgur\.com/(?:a|gallery)/([a-zA-Z0-9]+)([/?#].*)?$").ok()
});

/// A validated album URL and the id extracted from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumSource {
    url: String,
    id: String,
}

impl AlbumSource {
    /// Validates `url` and extracts the album id.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidSource`] if the URL does not point at
    /// an album or gallery.
    pub fn parse(url: &str) -> Result<Self, OperationError> {
        let url = url.trim();
        let id = ALBUM_URL
            .as_ref()
            .and_then(|re| re.captures(url))
            .and_then(|caps| caps.get(3))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| OperationError::InvalidSource(url.to_string()))?;

        Ok(Self { url: url.to_string(), id })
    }

    /// The URL as entered (trimmed).
    #[must_use]
    pub fn url(&self) -> &str { &self.url }

    /// The album id.
    #[must_use]
    pub fn id(&self) -> &str { &self.id }
}

impl std::fmt::Display for AlbumSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.url) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gallery_url() {
        let source = AlbumSource::parse("https://imgur.com/gallery/wCBYO").unwrap();
        assert_eq!(source.id(), "wCBYO");
        assert_eq!(source.url(), "https://imgur.com/gallery/wCBYO");
    }

    #[test]
    fn test_parse_album_url_variants() {
        for url in [
            "http://imgur.com/a/abc123",
            "https://www.imgur.com/a/abc123",
            "https://m.imgur.com/a/abc123",
            "https://www.m.imgur.com/gallery/abc123",
            "https://imgur.com/a/abc123#3",
            "https://imgur.com/a/abc123/",
            "https://imgur.com/a/abc123?utm=x",
            "https://imgur.com/a/abc123/layout/blog",
            "https://imgur.com/gallery/abc123#comments",
        ] {
            let source = AlbumSource::parse(url).unwrap();
            assert_eq!(source.id(), "abc123", "{url}");
        }
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let source = AlbumSource::parse("  https://imgur.com/a/xyz \n").unwrap();
        assert_eq!(source.url(), "https://imgur.com/a/xyz");
    }

    #[test]
    fn test_parse_rejects_other_urls() {
        for url in [
            "",
            "imgur.com/a/abc",
            "https://imgur.com/abc",
            "https://imgur.com/user/abc",
            "https://i.imgur.com/abc.jpg",
            "https://example.com/a/abc",
            "ftp://imgur.com/a/abc",
            "https://imgur.com/a/abc-def",
        ] {
            assert!(
                matches!(AlbumSource::parse(url), Err(OperationError::InvalidSource(_))),
                "{url}"
            );
        }
    }
}

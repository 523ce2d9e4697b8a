//! MIME content type with an optional charset parameter
//!
//! Accepts exactly `type/subtype` or `type/subtype; charset=value`. The charset
//! key matches case-insensitively, whitespace around the separator and the
//! value is ignored, and a double-quoted value has its quotes stripped.

use crate::error::InvalidArgument;
use std::fmt;
use std::str::FromStr;

/// Charset assumed when the header does not carry one
pub const DEFAULT_CHARSET: &str = "ISO-8859-1";

/// An immutable `type/subtype[; charset=...]` value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType {
    media_type: String,
    subtype: String,
    charset: Option<String>,
}

impl ContentType {
    /// Parse a `Content-Type` header value
    pub fn parse(value: &str) -> Result<Self, InvalidArgument> {
        let value = value.trim();
        if value.is_empty() {
            return Err(InvalidArgument::new("content type cannot be empty"));
        }

        let (essence, params) = match value.split_once(';') {
            Some((essence, params)) => (essence.trim_end(), Some(params)),
            None => (value, None),
        };

        let (media_type, subtype) = essence
            .split_once('/')
            .filter(|(t, s)| is_token(t) && is_token(s))
            .ok_or_else(|| InvalidArgument::new(format!("malformed content type: {value}")))?;

        let charset = match params {
            None => None,
            Some(params) => Some(parse_charset(params).ok_or_else(|| {
                InvalidArgument::new(format!("malformed content type parameter: {value}"))
            })?),
        };

        Ok(Self {
            media_type: media_type.to_string(),
            subtype: subtype.to_string(),
            charset,
        })
    }

    /// Build a charset-less content type
    pub fn create(media_type: &str, subtype: &str) -> Result<Self, InvalidArgument> {
        if media_type.is_empty() {
            return Err(InvalidArgument::new("type cannot be empty"));
        }
        if subtype.is_empty() {
            return Err(InvalidArgument::new("subtype cannot be empty"));
        }
        Ok(Self {
            media_type: media_type.to_string(),
            subtype: subtype.to_string(),
            charset: None,
        })
    }

    /// Return a copy of this content type carrying `charset`
    pub fn with_charset(&self, charset: &str) -> Result<Self, InvalidArgument> {
        if charset.is_empty() {
            return Err(InvalidArgument::new("charset cannot be empty"));
        }
        Ok(Self {
            charset: Some(charset.to_string()),
            ..self.clone()
        })
    }

    /// Top-level type, as written
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Subtype, as written
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// The declared charset, if any
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// The declared charset, or ISO-8859-1 when none was declared
    pub fn charset_or_default(&self) -> &str {
        self.charset.as_deref().unwrap_or(DEFAULT_CHARSET)
    }

    /// Compare type and subtype, ignoring ASCII case and charset
    pub fn is(&self, media_type: &str, subtype: &str) -> bool {
        self.media_type.eq_ignore_ascii_case(media_type) && self.subtype.eq_ignore_ascii_case(subtype)
    }
}

impl FromStr for ContentType {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.media_type, self.subtype)?;
        if let Some(charset) = &self.charset {
            write!(f, "; charset={charset}")?;
        }
        Ok(())
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '*'))
}

fn parse_charset(params: &str) -> Option<String> {
    let (key, value) = params.split_once('=')?;
    if !key.trim().eq_ignore_ascii_case("charset") {
        return None;
    }
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    is_charset_token(value).then(|| value.to_string())
}

fn is_charset_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '_' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(ct: &ContentType) -> u64 {
        let mut hasher = DefaultHasher::new();
        ct.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_parse_without_charset() {
        let html = ContentType::parse("text/html").unwrap();
        assert_eq!(html.media_type(), "text");
        assert_eq!(html.subtype(), "html");
        assert_eq!(html.charset(), None);
        assert_eq!(html.charset_or_default(), "ISO-8859-1");
    }

    #[test]
    fn test_parse_wildcard() {
        let wildcard = ContentType::parse("*/*").unwrap();
        assert_eq!(wildcard.media_type(), "*");
        assert_eq!(wildcard.subtype(), "*");
        assert_eq!(wildcard.charset(), None);
        assert_eq!(wildcard.charset_or_default(), "ISO-8859-1");
    }

    #[test]
    fn test_parse_with_charset() {
        let json = ContentType::parse("application/json; charset=UTF-8").unwrap();
        assert_eq!(json.media_type(), "application");
        assert_eq!(json.subtype(), "json");
        assert_eq!(json.charset(), Some("UTF-8"));
        assert_eq!(json.charset_or_default(), "UTF-8");
    }

    #[test]
    fn test_parse_charset_variants() {
        for header in [
            "text/html;charset=UTF-8",
            "text/html;  CHARSET=UTF-8 ",
            "text/html; Charset = UTF-8",
            "text/html; charset=\"UTF-8\"",
        ] {
            let ct = ContentType::parse(header).unwrap();
            assert_eq!(ct.charset(), Some("UTF-8"), "{header}");
        }
    }

    #[test]
    fn test_parse_keeps_case_of_type() {
        let ct = ContentType::parse("Text/HTML").unwrap();
        assert_eq!(ct.media_type(), "Text");
        assert_eq!(ct.subtype(), "HTML");
        assert!(ct.is("text", "html"));
        assert_ne!(ct, ContentType::parse("text/html").unwrap());
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(ContentType::parse("").is_err());
        assert!(ContentType::parse("   ").is_err());
    }

    #[test]
    fn test_parse_invalid_input() {
        for header in [
            "not valid input.",
            "text",
            "text/",
            "/html",
            "text/html/extra",
            "text/html;",
            "text/html; charset=",
            "text/html; boundary=xyz",
            "text/html; charset=\"\"",
        ] {
            assert!(ContentType::parse(header).is_err(), "{header} should be rejected");
        }
    }

    #[test]
    fn test_from_str() {
        let ct: ContentType = "text/xml; charset=utf-8".parse().unwrap();
        assert_eq!(ct.subtype(), "xml");
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn test_with_charset() {
        let content_type = ContentType::create("application", "json").unwrap();
        assert_eq!(content_type.media_type(), "application");
        assert_eq!(content_type.subtype(), "json");
        assert_eq!(content_type.charset(), None);
        assert_eq!(content_type.charset_or_default(), "ISO-8859-1");

        let with_charset = content_type.with_charset("UTF-8").unwrap();
        assert_eq!(with_charset.media_type(), "application");
        assert_eq!(with_charset.subtype(), "json");
        assert_eq!(with_charset.charset(), Some("UTF-8"));
        assert_eq!(with_charset.charset_or_default(), "UTF-8");

        // The receiver is left unchanged
        assert_eq!(content_type.charset(), None);
    }

    #[test]
    fn test_create_rejects_empty_parts() {
        assert!(ContentType::create("", "json").is_err());
        assert!(ContentType::create("application", "").is_err());
        let ct = ContentType::create("application", "json").unwrap();
        assert!(ct.with_charset("").is_err());
    }

    #[test]
    fn test_equals_and_hash() {
        let a = ContentType::parse("text/html; charset=UTF-8").unwrap();
        let b = ContentType::create("text", "html").unwrap().with_charset("UTF-8").unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let other_type = ContentType::parse("application/html; charset=UTF-8").unwrap();
        let other_subtype = ContentType::parse("text/xml; charset=UTF-8").unwrap();
        let other_charset = ContentType::parse("text/html; charset=UTF-16").unwrap();
        let no_charset = ContentType::parse("text/html").unwrap();
        for other in [other_type, other_subtype, other_charset, no_charset] {
            assert_ne!(a, other);
        }
    }

    #[test]
    fn test_display() {
        let ct = ContentType::parse("text/html;charset=UTF-8").unwrap();
        assert_eq!(ct.to_string(), "text/html; charset=UTF-8");
        assert_eq!(ContentType::parse("*/*").unwrap().to_string(), "*/*");
    }
}

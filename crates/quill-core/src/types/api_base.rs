//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL for the blog backend.
///
/// Endpoint paths such as `/api/posts/` are appended to the base, so a
/// backend mounted under a prefix (`https://example.com/blog`) keeps that
/// prefix.
///
/// # Example
///
/// ```
/// use quill_core::ApiBase;
///
/// let base = ApiBase::new("http://127.0.0.1:8000").unwrap();
/// assert_eq!(base.endpoint("/api/posts/").as_str(), "http://127.0.0.1:8000/api/posts/");
///
/// let prefixed = ApiBase::new("https://example.com/blog/").unwrap();
/// assert_eq!(prefixed.endpoint("/api/posts/").as_str(), "https://example.com/blog/api/posts/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiBase(Url);

impl ApiBase {
    /// Create a new base URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error unless the URL is an absolute `http` or `https`
    /// URL with a host and no query or fragment.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiBase {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Normalize: drop trailing slashes from the path
        let mut normalized = url;
        let path = normalized.path().trim_end_matches('/').to_string();
        normalized.set_path(&path);

        Ok(Self(normalized))
    }

    /// Returns the full URL for an endpoint path (which must start with `/`).
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.0.clone();
        let joined = format!("{}{}", self.0.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns true if the base points at the local machine.
    pub fn is_localhost(&self) -> bool {
        self.0
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]")
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let invalid = |reason: &str| -> Error {
            InvalidInputError::ApiBase {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if url.cannot_be_a_base() {
            return Err(invalid("must be an absolute URL"));
        }

        let scheme = url.scheme();
        if scheme != "https" && scheme != "http" {
            return Err(invalid("must use http or https"));
        }

        if url.host_str().is_none() {
            return Err(invalid("must have a host"));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query or fragment"));
        }

        Ok(())
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiBase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiBase {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiBase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiBase::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ApiBase {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let base = ApiBase::new("https://blog.example.com").unwrap();
        assert_eq!(base.host(), Some("blog.example.com"));
        assert!(!base.is_localhost());
    }

    #[test]
    fn valid_localhost_http() {
        let base = ApiBase::new("http://127.0.0.1:8000").unwrap();
        assert_eq!(base.host(), Some("127.0.0.1"));
        assert!(base.is_localhost());
    }

    #[test]
    fn endpoint_construction() {
        let base = ApiBase::new("http://127.0.0.1:8000").unwrap();
        assert_eq!(
            base.endpoint("/api/auth/refresh/").as_str(),
            "http://127.0.0.1:8000/api/auth/refresh/"
        );
    }

    #[test]
    fn normalizes_trailing_slash() {
        let base = ApiBase::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(
            base.endpoint("/api/posts/").as_str(),
            "http://127.0.0.1:8000/api/posts/"
        );
    }

    #[test]
    fn keeps_path_prefix() {
        let base = ApiBase::new("https://example.com/blog//").unwrap();
        assert_eq!(
            base.endpoint("/api/posts/7/").as_str(),
            "https://example.com/blog/api/posts/7/"
        );
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(ApiBase::new("ftp://example.com").is_err());
        assert!(ApiBase::new("file:///tmp/blog").is_err());
    }

    #[test]
    fn rejects_relative_url() {
        assert!(ApiBase::new("/api/posts/").is_err());
    }

    #[test]
    fn rejects_query() {
        assert!(ApiBase::new("https://example.com/?page=2").is_err());
    }

    #[test]
    fn deserializes_from_string() {
        let base: ApiBase = serde_json::from_str("\"http://localhost:8000\"").unwrap();
        assert!(base.is_localhost());
    }
}

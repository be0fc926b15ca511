//! Client configuration

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ClientError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend origin, optionally with a path prefix
    pub api_base: Url,
    /// User agent sent with every request
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(api_base: &str) -> Result<Self> {
        let api_base = Url::parse(api_base.trim())
            .map_err(|e| ClientError::InvalidUrl(format!("{api_base}: {e}")))?;

        if api_base.scheme() != "http" && api_base.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "unsupported scheme: {}",
                api_base.scheme()
            )));
        }

        Ok(Self {
            api_base,
            user_agent: format!("civic-client/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Resolve an API path against the base.
    ///
    /// The path is appended to the base, so a base with a path prefix keeps
    /// it. Query strings and percent escapes in `path` are preserved.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.api_base.as_str().trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };

        Url::parse(&joined).map_err(|e| ClientError::InvalidUrl(format!("{joined}: {e}")))
    }
}

/// Percent-encode one path segment or query value, leaving only
/// alphanumerics and `-._*` untouched.
pub(crate) fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let config = ClientConfig::new("http://localhost:4000").unwrap();
        assert_eq!(
            config.endpoint("/api/v1/reports").unwrap().as_str(),
            "http://localhost:4000/api/v1/reports"
        );
        assert_eq!(
            config.endpoint("auth/refresh").unwrap().as_str(),
            "http://localhost:4000/auth/refresh"
        );
    }

    #[test]
    fn test_endpoint_keeps_prefix() {
        let config = ClientConfig::new("https://example.org/backend/").unwrap();
        assert_eq!(
            config.endpoint("/api/v1/categories").unwrap().as_str(),
            "https://example.org/backend/api/v1/categories"
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            ClientConfig::new("ftp://example.org"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("photos/a b+c.jpg"), "photos%2Fa%20b%2Bc.jpg");
        assert_eq!(encode_component("abc-123_x.png"), "abc-123_x.png");
    }
}

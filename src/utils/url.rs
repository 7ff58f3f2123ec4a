//! URL utilities for endpoint validation
//!
//! These checks run before any network traffic: an endpoint that fails them
//! is classified invalid without being requested.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Scheme repeated at the start of the URL, e.g. `https'://https://host/...`
static DUPLICATED_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*'?://[A-Za-z][A-Za-z0-9+.-]*'?://").unwrap());

/// `http`/`https` followed by stray characters before `://`, e.g. `httpsG://`
static CORRUPTED_SCHEME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?[^:/s][^:/]*://").unwrap());

/// Why an endpoint cannot be probed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointDefect {
    /// Known typo or duplication pattern in the scheme
    Malformed,
    /// Missing scheme or host
    Unparseable,
}

impl EndpointDefect {
    pub fn detail(self) -> &'static str {
        match self {
            Self::Malformed => "Malformed URL (duplicate protocol or typo)",
            Self::Unparseable => "Invalid URL format",
        }
    }
}

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Whether the endpoint matches a known typo or duplication pattern
    ///
    /// # Examples
    ///
    /// ```rust
    /// use m3u_curator::utils::url::UrlUtils;
    ///
    /// assert!(UrlUtils::is_malformed("https'://https://x.com/y"));
    /// assert!(UrlUtils::is_malformed("httpsG://x.com/y"));
    /// assert!(!UrlUtils::is_malformed("https://x.com/y?next=http://z"));
    /// ```
    pub fn is_malformed(url: &str) -> bool {
        DUPLICATED_SCHEME.is_match(url) || CORRUPTED_SCHEME.is_match(url)
    }

    /// Parse and require both a scheme and a non-empty host
    pub fn parse_with_host(url: &str) -> Option<Url> {
        let parsed = Url::parse(url).ok()?;
        match parsed.host_str() {
            Some(host) if !host.is_empty() => Some(parsed),
            _ => None,
        }
    }

    /// Run both pre-flight checks, malformation first
    pub fn check_endpoint(url: &str) -> Result<Url, EndpointDefect> {
        if Self::is_malformed(url) {
            return Err(EndpointDefect::Malformed);
        }
        Self::parse_with_host(url).ok_or(EndpointDefect::Unparseable)
    }
}

/// Clip a message to at most `max_chars` characters
pub fn truncate_chars(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((byte_index, _)) => message[..byte_index].to_string(),
        None => message.to_string(),
    }
}

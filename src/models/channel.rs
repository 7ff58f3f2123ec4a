//! Channel record model
//!
//! A [`ChannelRecord`] is one logical stream entry. Records are assembled once
//! (from a feed entry or from a decoded playlist) and only ever read after
//! that: probing and rewriting produce separate result values that borrow
//! the record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::RecordError;

/// Name given to channels that arrive without one
pub const UNKNOWN_NAME: &str = "Unknown";

/// Category label of a channel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupTag {
    Sports,
    Entertainment,
    News,
    General,
    Custom(String),
}

impl GroupTag {
    /// The built-in tags in playlist emission order
    pub const BUILT_IN: [GroupTag; 4] = [
        GroupTag::Sports,
        GroupTag::Entertainment,
        GroupTag::News,
        GroupTag::General,
    ];

    /// Map a `group-title` value back to a tag
    pub fn from_label(label: &str) -> Self {
        match label {
            "Sports" => Self::Sports,
            "Entertainment" => Self::Entertainment,
            "News" => Self::News,
            "General" => Self::General,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Group of entries decoded without a `group-title`
    pub fn unknown() -> Self {
        Self::Custom(UNKNOWN_NAME.to_string())
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Sports => "Sports",
            Self::Entertainment => "Entertainment",
            Self::News => "News",
            Self::General => "General",
            Self::Custom(label) => label,
        }
    }

    pub fn is_built_in(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for GroupTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One logical stream entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelRecord {
    name: String,
    title: String,
    endpoint: String,
    group: GroupTag,
    logo: Option<String>,
    epg_id: Option<String>,
    source_line: Option<usize>,
    endpoint_line: Option<usize>,
}

impl ChannelRecord {
    /// Create a record; fails when the endpoint is blank
    ///
    /// An empty name becomes [`UNKNOWN_NAME`] and the title defaults to the name.
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Result<Self, RecordError> {
        let mut name = name.into();
        let endpoint = endpoint.into();

        if name.trim().is_empty() {
            name = UNKNOWN_NAME.to_string();
        }
        if endpoint.trim().is_empty() {
            return Err(RecordError::EmptyEndpoint { name });
        }

        Ok(Self {
            title: name.clone(),
            name,
            endpoint,
            group: GroupTag::General,
            logo: None,
            epg_id: None,
            source_line: None,
            endpoint_line: None,
        })
    }

    /// Set the display label; blank labels keep the name
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        if !title.trim().is_empty() {
            self.title = title;
        }
        self
    }

    pub fn with_group(mut self, group: GroupTag) -> Self {
        self.group = group;
        self
    }

    pub fn with_logo(mut self, logo: Option<String>) -> Self {
        self.logo = logo.filter(|l| !l.is_empty());
        self
    }

    /// Zero and empty identifiers are treated as absent
    pub fn with_epg_id(mut self, epg_id: Option<String>) -> Self {
        self.epg_id = epg_id.filter(|id| !id.is_empty() && id != "0");
        self
    }

    /// Attach the 1-based playlist positions of the descriptor and endpoint lines
    pub fn with_lines(mut self, source_line: usize, endpoint_line: usize) -> Self {
        self.source_line = Some(source_line);
        self.endpoint_line = Some(endpoint_line);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn group(&self) -> &GroupTag {
        &self.group
    }

    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    pub fn epg_id(&self) -> Option<&str> {
        self.epg_id.as_deref()
    }

    pub fn source_line(&self) -> Option<usize> {
        self.source_line
    }

    pub fn endpoint_line(&self) -> Option<usize> {
        self.endpoint_line
    }
}

/// A channel entry as it appears in a structured feed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChannel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub pict: Option<String>,
    /// Numeric in most feeds, occasionally a string
    #[serde(default)]
    pub epg_id: Option<serde_json::Value>,
}

impl RawChannel {
    /// Display name, [`UNKNOWN_NAME`] when missing or blank
    pub fn name_or_unknown(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNKNOWN_NAME,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.href.as_deref().unwrap_or_default()
    }

    /// Whether the entry carries a usable URL
    pub fn has_endpoint(&self) -> bool {
        !self.endpoint().trim().is_empty()
    }

    /// Normalized EPG identifier, `None` for missing, zero or empty values
    pub fn epg_id_string(&self) -> Option<String> {
        match self.epg_id.as_ref()? {
            serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) if s.is_empty() || s == "0" => None,
            serde_json::Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl From<&ChannelRecord> for RawChannel {
    fn from(record: &ChannelRecord) -> Self {
        Self {
            name: Some(record.name.clone()),
            title: Some(record.title.clone()),
            href: Some(record.endpoint.clone()),
            pict: record.logo.clone(),
            epg_id: record.epg_id.clone().map(serde_json::Value::String),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_endpoint_rejected() {
        let err = ChannelRecord::new("Al Jazeera", "  ").unwrap_err();
        assert_eq!(
            err,
            RecordError::EmptyEndpoint {
                name: "Al Jazeera".to_string()
            }
        );
    }

    #[test]
    fn test_defaults() {
        let record = ChannelRecord::new("", "http://a.example/live").unwrap();
        assert_eq!(record.name(), UNKNOWN_NAME);
        assert_eq!(record.title(), UNKNOWN_NAME);
        assert_eq!(record.group(), &GroupTag::General);
        assert_eq!(record.source_line(), None);
        assert_eq!(record.endpoint_line(), None);
    }

    #[test]
    fn test_optional_attributes_normalized() {
        let record = ChannelRecord::new("MBC 1", "http://a.example/mbc1")
            .unwrap()
            .with_title("")
            .with_logo(Some(String::new()))
            .with_epg_id(Some("0".to_string()));

        assert_eq!(record.title(), "MBC 1");
        assert_eq!(record.logo(), None);
        assert_eq!(record.epg_id(), None);
    }

    #[test]
    fn test_group_tag_labels_round_trip() {
        for tag in GroupTag::BUILT_IN {
            assert_eq!(GroupTag::from_label(tag.label()), tag);
            assert!(tag.is_built_in());
        }
        let custom = GroupTag::from_label("Kids");
        assert_eq!(custom, GroupTag::Custom("Kids".to_string()));
        assert!(!custom.is_built_in());
    }

    #[test]
    fn test_raw_channel_epg_id_forms() {
        let parse = |json: &str| serde_json::from_str::<RawChannel>(json).unwrap();

        assert_eq!(parse(r#"{"epg_id": 1234}"#).epg_id_string(), Some("1234".to_string()));
        assert_eq!(parse(r#"{"epg_id": 0}"#).epg_id_string(), None);
        assert_eq!(parse(r#"{"epg_id": "abc.tv"}"#).epg_id_string(), Some("abc.tv".to_string()));
        assert_eq!(parse(r#"{"epg_id": ""}"#).epg_id_string(), None);
        assert_eq!(parse(r#"{}"#).epg_id_string(), None);
    }

    #[test]
    fn test_raw_channel_name_fallback() {
        let raw = RawChannel {
            href: Some("http://a.example/x".to_string()),
            ..RawChannel::default()
        };
        assert_eq!(raw.name_or_unknown(), UNKNOWN_NAME);
        assert_eq!(raw.endpoint(), "http://a.example/x");
        assert!(raw.has_endpoint());

        let blank = RawChannel {
            name: Some(" \t".to_string()),
            href: Some("  ".to_string()),
            ..RawChannel::default()
        };
        assert_eq!(blank.name_or_unknown(), UNKNOWN_NAME);
        assert!(!blank.has_endpoint());
    }
}

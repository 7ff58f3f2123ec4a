//! M3U playlist decoding
//!
//! This module turns playlist text into [`ChannelRecord`]s. Every record
//! remembers the 1-based line numbers of its `#EXTINF` descriptor and of its
//! URL line; those positions are the coordinates the rewriter later uses to
//! include or drop lines of the original file.
//!
//! # Grammar
//! - `#EXTM3U` marker and blank lines are skipped
//! - `#EXTINF:duration key="value" ...,label` opens a pending channel
//! - a line starting with a stream scheme completes the pending channel, or
//!   becomes a bare channel when nothing is pending
//! - other `#` lines are comments and leave a pending channel untouched

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::models::{ChannelRecord, GroupTag, UNKNOWN_NAME};

pub const EXTM3U_MARKER: &str = "#EXTM3U";
pub const EXTINF_PREFIX: &str = "#EXTINF:";

/// Line prefixes that mark a stream URL line
///
/// `http` is matched without `://` so that corrupted schemes such as
/// `httpsG://` are still read as endpoints and reported as invalid.
pub const ENDPOINT_PREFIXES: &[&str] = &["http", "rtmp", "rtsp", "mms", "udp://", "rtp://"];

/// Whether a trimmed line is an `#EXTINF` descriptor
pub fn is_descriptor_line(line: &str) -> bool {
    line.starts_with(EXTINF_PREFIX)
}

/// Whether a trimmed line is a stream URL
pub fn is_endpoint_line(line: &str) -> bool {
    ENDPOINT_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

/// Metadata carried by an `#EXTINF` line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtinfDescriptor {
    pub label: String,
    pub attributes: HashMap<String, String>,
}

impl ExtinfDescriptor {
    /// Parse an `#EXTINF` line
    ///
    /// Format: `#EXTINF:duration,title`
    /// Extended: `#EXTINF:duration tvg-id="id" tvg-logo="logo" group-title="group",title`
    ///
    /// The label is whatever follows the last comma outside a quoted value;
    /// a line without such a comma has an empty label.
    pub fn parse(line: &str) -> Self {
        let extinf_content = line.strip_prefix(EXTINF_PREFIX).unwrap_or(line);

        let (duration_and_attrs, label) = match label_comma(extinf_content) {
            Some(comma_pos) => (&extinf_content[..comma_pos], extinf_content[comma_pos + 1..].trim()),
            None => (extinf_content, ""),
        };

        Self {
            label: label.to_string(),
            attributes: parse_extinf_attributes(duration_and_attrs),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn into_record(self, endpoint: &str, source_line: usize, endpoint_line: usize) -> Option<ChannelRecord> {
        let name = self.attribute("tvg-name").unwrap_or(UNKNOWN_NAME);
        let group = self
            .attribute("group-title")
            .map(GroupTag::from_label)
            .unwrap_or_else(GroupTag::unknown);

        let record = match ChannelRecord::new(name, endpoint) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping channel at line {}: {}", source_line, e);
                return None;
            }
        };

        Some(
            record
                .with_title(self.label.as_str())
                .with_group(group)
                .with_logo(self.attribute("tvg-logo").map(str::to_string))
                .with_epg_id(self.attribute("tvg-id").map(str::to_string))
                .with_lines(source_line, endpoint_line),
        )
    }
}

/// Byte offset of the comma that starts the label
///
/// Commas inside quoted values are skipped. An unbalanced quote falls back
/// to the last comma anywhere.
fn label_comma(extinf_content: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut last = None;
    for (i, ch) in extinf_content.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => last = Some(i),
            _ => {}
        }
    }

    if in_quotes {
        extinf_content.rfind(',')
    } else {
        last
    }
}

/// Parse attributes from the part of an EXTINF line before the label
/// (`tvg-id="value"` format, unquoted values end at whitespace)
fn parse_extinf_attributes(attrs_part: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();

    let mut chars = attrs_part.chars().peekable();
    let mut current_key = String::new();
    let mut current_value = String::new();
    let mut in_quotes = false;
    let mut in_key = false;
    let mut in_value = false;

    while let Some(ch) = chars.next() {
        match ch {
            ' ' | '\t' if !in_quotes => {
                if in_value && !current_key.is_empty() && !current_value.is_empty() {
                    attributes.insert(current_key.clone(), current_value.clone());
                }
                current_key.clear();
                current_value.clear();
                in_key = true;
                in_value = false;
            }
            '=' if !in_quotes && in_key => {
                in_key = false;
                in_value = true;
                if chars.peek() == Some(&'"') {
                    chars.next();
                    in_quotes = true;
                }
            }
            '"' if in_value => {
                in_quotes = false;
                if !current_key.is_empty() {
                    attributes.insert(current_key.clone(), current_value.clone());
                }
                current_key.clear();
                current_value.clear();
                in_value = false;
                in_key = true;
            }
            _ => {
                if in_key {
                    current_key.push(ch);
                } else if in_value {
                    current_value.push(ch);
                }
            }
        }
    }

    // Handle final unquoted value
    if in_value && !in_quotes && !current_key.is_empty() && !current_value.is_empty() {
        attributes.insert(current_key, current_value);
    }

    attributes
}

/// Stateless M3U decoder
#[derive(Debug, Default, Clone, Copy)]
pub struct M3uParser;

impl M3uParser {
    pub fn new() -> Self {
        Self
    }

    /// Decode playlist text into records carrying their line positions
    pub fn parse(&self, content: &str) -> Vec<ChannelRecord> {
        let mut channels = Vec::new();
        let mut pending: Option<(usize, ExtinfDescriptor)> = None;
        let mut bare_count = 0usize;

        for (index, raw_line) in content.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();

            if line.is_empty() || line == EXTM3U_MARKER {
                continue;
            }

            if is_descriptor_line(line) {
                if let Some((previous, _)) = &pending {
                    debug!("EXTINF at line {} has no URL, replaced by line {}", previous, line_number);
                }
                pending = Some((line_number, ExtinfDescriptor::parse(line)));
            } else if is_endpoint_line(line) {
                let record = match pending.take() {
                    Some((source_line, descriptor)) => descriptor.into_record(line, source_line, line_number),
                    None => {
                        bare_count += 1;
                        debug!("Found stream URL without EXTINF metadata at line {}", line_number);
                        ChannelRecord::new(UNKNOWN_NAME, line)
                            .ok()
                            .map(|r| r.with_group(GroupTag::unknown()).with_lines(line_number, line_number))
                    }
                };
                channels.extend(record);
            }
        }

        if bare_count > 0 {
            info!("{} stream URLs had no EXTINF metadata", bare_count);
        }
        debug!("Parsed {} channels from playlist", channels.len());
        channels
    }
}

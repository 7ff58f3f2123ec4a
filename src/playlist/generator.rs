//! M3U playlist generation from deduplicated records
//!
//! Records are grouped by tag. The four built-in tags come first in a fixed
//! order, followed by custom tags in order of first appearance. Within a
//! group, records keep their arrival order.

use chrono::{Local, NaiveDateTime};
use std::fmt::Write;
use tracing::debug;

use super::TIMESTAMP_FORMAT;
use crate::models::{ChannelRecord, GroupTag};
use crate::sources::m3u::{EXTINF_PREFIX, EXTM3U_MARKER};

static BUILT_IN_ORDER: [GroupTag; 4] = GroupTag::BUILT_IN;

/// Records of one group, in arrival order
pub type GroupSection<'a> = (&'a GroupTag, Vec<&'a ChannelRecord>);

/// Group records for emission; empty groups are left out
pub fn group_records(records: &[ChannelRecord]) -> Vec<GroupSection<'_>> {
    let mut sections: Vec<GroupSection<'_>> = BUILT_IN_ORDER.iter().map(|tag| (tag, Vec::new())).collect();

    for record in records {
        match sections.iter().position(|(tag, _)| *tag == record.group()) {
            Some(index) => sections[index].1.push(record),
            None => sections.push((record.group(), vec![record])),
        }
    }

    sections.retain(|(_, members)| !members.is_empty());
    sections
}

/// Encodes records into playlist text
#[derive(Debug, Clone)]
pub struct PlaylistGenerator {
    generated_at: NaiveDateTime,
}

impl PlaylistGenerator {
    /// Generator stamping output with a fixed time
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self { generated_at }
    }

    /// Generator stamping output with the local wall clock
    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// Render the full playlist
    pub fn generate(&self, records: &[ChannelRecord], duplicates_removed: usize) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", EXTM3U_MARKER);
        let _ = writeln!(
            out,
            "# Generated from JSON files - {}",
            self.generated_at.format(TIMESTAMP_FORMAT)
        );
        let _ = writeln!(out, "# Total Channels: {}", records.len());
        let _ = writeln!(out, "# Duplicates Removed: {}", duplicates_removed);
        out.push('\n');

        for (tag, members) in group_records(records) {
            debug!("Writing {} channels in group {}", members.len(), tag);
            let _ = writeln!(out, "# ========== {} Channels ==========", tag);
            out.push('\n');

            for record in members {
                let _ = writeln!(out, "{}", Self::descriptor_line(record));
                let _ = writeln!(out, "{}", record.endpoint());
            }
        }

        out
    }

    /// Build the `#EXTINF` line for a record
    ///
    /// Optional attributes come first and are omitted when absent.
    pub fn descriptor_line(record: &ChannelRecord) -> String {
        let mut line = format!("{}-1", EXTINF_PREFIX);

        if let Some(epg_id) = record.epg_id() {
            let _ = write!(line, " tvg-id=\"{}\"", epg_id);
        }
        if let Some(logo) = record.logo() {
            let _ = write!(line, " tvg-logo=\"{}\"", logo);
        }

        let _ = write!(
            line,
            " tvg-name=\"{}\" group-title=\"{}\",{}",
            record.name(),
            record.group(),
            record.title()
        );
        line
    }
}

//! Position-preserving playlist rewriting
//!
//! The original playlist is held as an arena of lines numbered from 1, each
//! line kept with its own terminator. Probe results are reduced to sets of
//! line positions, and every output mode is a single pass over the arena that
//! includes or excludes whole lines by position. Retained lines are copied
//! byte for byte and never reordered.
//!
//! Line numbering matches [`M3uParser`](crate::sources::M3uParser), which
//! counts the same physical lines.

use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use tracing::debug;

use super::TIMESTAMP_FORMAT;
use crate::models::{ProbeResult, ProbeSummary};
use crate::sources::m3u::{EXTM3U_MARKER, is_descriptor_line, is_endpoint_line};

/// Original playlist lines, addressable by 1-based position
#[derive(Debug, Clone)]
pub struct SourceLines<'t> {
    lines: Vec<&'t str>,
}

impl<'t> SourceLines<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            lines: text.split_inclusive('\n').collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `position`, terminator included
    pub fn get(&self, position: usize) -> Option<&'t str> {
        position.checked_sub(1).and_then(|i| self.lines.get(i)).copied()
    }

    /// `(position, line)` pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'t str)> + '_ {
        self.lines.iter().enumerate().map(|(i, line)| (i + 1, *line))
    }
}

/// Descriptor and endpoint positions per outcome class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineClassification {
    pub working_descriptors: HashSet<usize>,
    pub working_endpoints: HashSet<usize>,
    pub dead_descriptors: HashSet<usize>,
    pub dead_endpoints: HashSet<usize>,
    /// Endpoint position of each not-working descriptor
    pub dead_pairs: HashMap<usize, usize>,
}

impl LineClassification {
    /// Collect positions from results; records without positions are ignored
    pub fn from_results(results: &[ProbeResult<'_>]) -> Self {
        let mut classification = Self::default();

        for result in results {
            let (descriptors, endpoints) = if result.status.is_working() {
                (
                    &mut classification.working_descriptors,
                    &mut classification.working_endpoints,
                )
            } else {
                (
                    &mut classification.dead_descriptors,
                    &mut classification.dead_endpoints,
                )
            };

            descriptors.extend(result.record.source_line());
            endpoints.extend(result.record.endpoint_line());

            if let (false, Some(descriptor), Some(endpoint)) = (
                result.status.is_working(),
                result.record.source_line(),
                result.record.endpoint_line(),
            ) {
                classification.dead_pairs.insert(descriptor, endpoint);
            }
        }

        classification
    }

    fn is_dead(&self, position: usize) -> bool {
        self.dead_descriptors.contains(&position) || self.dead_endpoints.contains(&position)
    }
}

/// Produces derived playlists from the original lines and a classification
#[derive(Debug)]
pub struct PlaylistRewriter<'t> {
    source: SourceLines<'t>,
    classification: LineClassification,
}

impl<'t> PlaylistRewriter<'t> {
    pub fn new(source: SourceLines<'t>, classification: LineClassification) -> Self {
        Self { source, classification }
    }

    /// Build from playlist text and probe results
    pub fn from_results(text: &'t str, results: &[ProbeResult<'_>]) -> Self {
        Self::new(SourceLines::new(text), LineClassification::from_results(results))
    }

    pub fn classification(&self) -> &LineClassification {
        &self.classification
    }

    /// The original with every not-working descriptor and endpoint line removed
    pub fn prune(&self) -> String {
        let mut out = String::with_capacity(self.source.lines.iter().map(|l| l.len()).sum());
        let mut removed = 0usize;

        for (position, line) in self.source.iter() {
            if self.classification.is_dead(position) {
                removed += 1;
                continue;
            }
            out.push_str(line);
        }

        debug!("Pruned {} of {} lines", removed, self.source.len());
        out
    }

    /// Working-only playlist
    ///
    /// A not-working descriptor decides for its pair: its own endpoint line
    /// and any lines in between are suppressed with it. A descriptor that
    /// never got a URL is dropped alone. Everything else that is not a
    /// channel line passes through.
    pub fn working(&self) -> String {
        let mut out = String::new();
        out.push_str(EXTM3U_MARKER);
        out.push('\n');

        let mut suppress_through: Option<usize> = None;
        for (position, line) in self.source.iter() {
            if let Some(end) = suppress_through {
                if position <= end {
                    continue;
                }
                suppress_through = None;
            }

            let trimmed = line.trim();
            if position == 1 && trimmed == EXTM3U_MARKER {
                continue;
            }

            if is_descriptor_line(trimmed) {
                if self.classification.working_descriptors.contains(&position) {
                    out.push_str(line);
                } else if let Some(&endpoint) = self.classification.dead_pairs.get(&position) {
                    suppress_through = Some(endpoint);
                }
            } else if is_endpoint_line(trimmed) {
                if self.classification.working_endpoints.contains(&position) {
                    out.push_str(line);
                }
            } else {
                out.push_str(line);
            }
        }

        out
    }

    /// Synthesized not-working playlist, failed streams first, each class sorted by name
    pub fn not_working(&self, summary: &ProbeSummary<'_, '_>, generated_at: NaiveDateTime) -> String {
        render_not_working(summary, generated_at)
    }
}

/// Render the not-working playlist from a summary alone
///
/// The output does not copy any original line, so it needs no source text.
pub fn render_not_working(summary: &ProbeSummary<'_, '_>, generated_at: NaiveDateTime) -> String {
    let (_, failed, invalid) = summary.sorted_by_name();
    let mut out = String::new();

    let _ = writeln!(out, "{}", EXTM3U_MARKER);
    let _ = writeln!(
        out,
        "# Not Working Streams - Generated {}",
        generated_at.format(TIMESTAMP_FORMAT)
    );
    let _ = writeln!(out, "# Total: {} streams", summary.not_working_count());
    let _ = writeln!(
        out,
        "# Failed: {} | Invalid URLs: {}",
        failed.len(),
        invalid.len()
    );
    out.push('\n');

    let sections = [
        ("# ========== FAILED STREAMS (Connection/Timeout Issues) ==========", failed),
        ("# ========== INVALID URLs (Malformed/Broken URLs) ==========", invalid),
    ];
    for (banner, items) in sections {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}\n", banner);
        for item in items {
            let record = item.record;
            let _ = writeln!(
                out,
                "#EXTINF:-1 tvg-name=\"{}\" group-title=\"{}\",{}",
                record.name(),
                record.group(),
                record.name()
            );
            let _ = writeln!(
                out,
                "# ERROR: {} | Original Line: {}",
                item.error_detail.as_deref().unwrap_or_default(),
                record
                    .endpoint_line()
                    .map(|n| n.to_string())
                    .unwrap_or_default()
            );
            let _ = writeln!(out, "{}\n", record.endpoint());
        }
    }

    out
}

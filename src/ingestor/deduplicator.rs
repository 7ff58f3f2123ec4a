//! Channel deduplication
//!
//! Deduplication is keyed on two identities, checked in order:
//!
//! 1. the endpoint: the first entry with a given URL wins;
//! 2. the display name: once a name is taken, later entries with the same
//!    name but a different URL are dropped as redundant.
//!
//! The seen-sets live in a [`DedupIndex`] owned by a single run and are
//! dropped when the run returns.

use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::categorizer::categorize;
use crate::models::{ChannelRecord, RawChannel};

/// Seen endpoints and first-seen endpoint per name for one ingestion pass
#[derive(Debug, Default)]
pub struct DedupIndex {
    seen_endpoints: HashSet<String>,
    seen_names: HashMap<String, String>,
}

/// Why an entry was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    Endpoint,
    Name,
}

impl DedupIndex {
    /// Check an entry against the index, registering it when it is new
    pub fn admit(&mut self, name: &str, endpoint: &str) -> Result<(), DuplicateKind> {
        if self.seen_endpoints.contains(endpoint) {
            return Err(DuplicateKind::Endpoint);
        }
        if let Some(first_endpoint) = self.seen_names.get(name) {
            if first_endpoint != endpoint {
                return Err(DuplicateKind::Name);
            }
        }

        self.seen_endpoints.insert(endpoint.to_string());
        self.seen_names.insert(name.to_string(), endpoint.to_string());
        Ok(())
    }
}

/// Output of a deduplication run
#[derive(Debug, Default)]
pub struct DedupOutcome {
    pub records: Vec<ChannelRecord>,
    pub duplicates_removed: usize,
}

/// Turns raw feed entries into an ordered, duplicate-free record sequence
#[derive(Debug, Default)]
pub struct Deduplicator {
    index: DedupIndex,
    outcome: DedupOutcome,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deduplicate a whole sequence in one go
    pub fn run<I>(entries: I) -> DedupOutcome
    where
        I: IntoIterator<Item = RawChannel>,
    {
        let mut deduplicator = Self::new();
        deduplicator.extend(entries);
        deduplicator.finish()
    }

    /// Feed more entries; successive calls behave like one concatenated input
    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = RawChannel>,
    {
        for entry in entries {
            self.push(entry);
        }
    }

    pub fn push(&mut self, entry: RawChannel) {
        // Blank URLs never reach the index
        if !entry.has_endpoint() {
            return;
        }
        let endpoint = entry.endpoint();
        let name = entry.name_or_unknown();

        match self.index.admit(name, endpoint) {
            Ok(()) => {}
            Err(DuplicateKind::Endpoint) => {
                self.outcome.duplicates_removed += 1;
                debug!("Duplicate URL skipped: {} ({})", name, endpoint);
                return;
            }
            Err(DuplicateKind::Name) => {
                self.outcome.duplicates_removed += 1;
                debug!("Same name, different URL skipped: {} ({})", name, endpoint);
                return;
            }
        }

        let record = match ChannelRecord::new(name, endpoint) {
            Ok(record) => record,
            Err(e) => {
                debug!("Discarding entry: {}", e);
                return;
            }
        };

        let record = record
            .with_title(entry.title.clone().unwrap_or_default())
            .with_group(categorize(name))
            .with_logo(entry.pict.clone())
            .with_epg_id(entry.epg_id_string());

        self.outcome.records.push(record);
    }

    /// Consume the run, dropping the index
    pub fn finish(self) -> DedupOutcome {
        info!(
            "Deduplication kept {} channels, removed {} duplicates",
            self.outcome.records.len(),
            self.outcome.duplicates_removed
        );
        self.outcome
    }
}

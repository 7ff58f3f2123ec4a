//! Channel ingestion: categorization and deduplication of raw feed entries

pub mod categorizer;
pub mod deduplicator;

pub use categorizer::categorize;
pub use deduplicator::{DedupIndex, DedupOutcome, Deduplicator, DuplicateKind};

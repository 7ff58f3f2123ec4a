//! Playlist artifact production
//!
//! - [`generator`]: encodes deduplicated records into a fresh playlist
//! - [`rewriter`]: maps probe results back onto an existing playlist
//! - [`report`]: renders the detailed plain-text probe report

pub mod generator;
pub mod report;
pub mod rewriter;

pub use generator::PlaylistGenerator;
pub use report::render_report;
pub use rewriter::{LineClassification, PlaylistRewriter, SourceLines, render_not_working};

/// Timestamp format used in generated headers and reports
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

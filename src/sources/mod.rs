//! Channel sources
//!
//! Two kinds of input feed the pipeline:
//! - **JSON feeds** ([`feed`]): folders of documents with a `result` array of
//!   raw channel entries, which still need deduplication
//! - **M3U playlists** ([`m3u`]): existing playlist text, decoded into records
//!   that remember their line positions

pub mod feed;
pub mod m3u;

pub use feed::{FeedDocument, FeedLoader};
pub use m3u::{ExtinfDescriptor, M3uParser, is_descriptor_line, is_endpoint_line};

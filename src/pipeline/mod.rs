//! End-to-end workflows
//!
//! The orchestrator wires the stages together: feeds are loaded and
//! deduplicated into a playlist (`convert`), and playlists are decoded,
//! probed and rewritten (`check`). Each stage owns the collection it creates
//! and hands read-only views downstream.

pub mod orchestrator;

pub use orchestrator::{CheckOptions, CheckOutcome, ConvertOptions, ConvertOutcome, Orchestrator};

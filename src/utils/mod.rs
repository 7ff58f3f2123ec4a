//! Utility modules for the playlist curator
//!
//! This module contains reusable utilities that can be used
//! across different parts of the system.

pub mod http_client;
pub mod human_format;
pub mod url;

// Re-export commonly used types for convenience
pub use http_client::{ProbeHttpClient, StandardProbeClient, TransportError};
pub use human_format::{format_duration, format_percent};
pub use url::{EndpointDefect, UrlUtils, truncate_chars};

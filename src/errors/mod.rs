//! Centralized error handling for the playlist curator
//!
//! Library code returns the typed errors defined in [`types`]; the binary
//! converts them into `anyhow` at the top level.
//!
//! # Error Categories
//!
//! - **Input Errors**: missing or unreadable feeds and playlists
//! - **Record Errors**: channel entries that cannot become a record
//! - **Rewrite Errors**: output targets that cannot be backed up or written
//! - **Configuration Errors**: unreadable or invalid config files
//!
//! Probe failures are not errors: a dead stream is recorded as a
//! [`ProbeStatus`](crate::models::ProbeStatus) on its result.
//!
//! # Usage
//!
//! ```rust
//! use m3u_curator::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("probe.concurrency must be at least 1"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Input Results
pub type InputResult<T> = Result<T, InputError>;

/// Convenience type alias for Rewrite Results
pub type RewriteResult<T> = Result<T, RewriteError>;

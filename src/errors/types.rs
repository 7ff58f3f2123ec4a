//! Error type definitions for the playlist curator
//!
//! This module defines the error hierarchy used throughout the crate. Each
//! pipeline stage has its own enum so callers can decide per stage whether a
//! failure is fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Input loading errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Output rewriting errors
    #[error("Rewrite error: {0}")]
    Rewrite(#[from] RewriteError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while loading feeds or playlists
#[derive(Error, Debug)]
pub enum InputError {
    /// Source path does not exist
    #[error("Input not found: {}", path.display())]
    Missing { path: PathBuf },

    /// Source exists but could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structured document could not be decoded
    #[error("Malformed document {}: {message}", path.display())]
    MalformedDocument { path: PathBuf, message: String },

    /// Folder contained no feed documents at all
    #[error("No JSON files found in '{}'", path.display())]
    NoDocuments { path: PathBuf },

    /// Feed documents were found but none of them could be used
    #[error("None of the {count} documents in '{}' could be used", path.display())]
    NoUsableDocuments { path: PathBuf, count: usize },

    /// Nothing decoded into a channel
    #[error("No channels found in {}", path.display())]
    NoChannels { path: PathBuf },
}

/// Errors raised when building a channel record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Every record needs an endpoint; entries without one never enter the pipeline
    #[error("Channel '{name}' has an empty endpoint")]
    EmptyEndpoint { name: String },
}

/// Errors raised while producing an output artifact
#[derive(Error, Debug)]
pub enum RewriteError {
    /// The pre-rewrite backup could not be created
    #[error("Could not create backup {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl InputError {
    /// Build an `Unreadable` error, mapping `NotFound` to `Missing`
    pub fn from_io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::Missing { path }
        } else {
            Self::Unreadable { path, source }
        }
    }

    /// Create a malformed document error
    pub fn malformed<P: Into<PathBuf>, M: Into<String>>(path: P, message: M) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl RewriteError {
    /// Destination path the failed operation was targeting
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Backup { path, .. } | Self::Write { path, .. } => path,
        }
    }
}

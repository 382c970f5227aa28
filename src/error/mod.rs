//! Error types for fan-out I/O operations.
//!
//! This module provides:
//! - `DestinationError`: A single destination write failure with context
//! - `AggregateError`: Every destination failure of one parallel write
//! - `ConfigError`: Failure to load a `Config` from text
//!
//! Strategy writes honour the `std::io::Write` contract and return
//! `io::Error`. The typed errors above ride inside as the error payload;
//! use [`destination_error`] and [`aggregate_error`] to get them back.

use std::fmt;
use std::io;

use thiserror::Error;

/// A write that failed on one destination.
#[derive(Debug)]
pub struct DestinationError {
    /// Registry key of the destination
    pub key: u64,
    /// Identifier of the target when it was registered from an `OutputSpec`
    pub target: Option<String>,
    /// Bytes the destination accepted before failing
    pub written: usize,
    /// The underlying error
    pub source: io::Error,
}

impl DestinationError {
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }

    /// Wrap into an `io::Error` that keeps the destination's error kind.
    pub fn into_io(self) -> io::Error {
        io::Error::new(self.source.kind(), self)
    }
}

impl fmt::Display for DestinationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(t) => write!(f, "[#{} {}]", self.key, t)?,
            None => write!(f, "[#{}]", self.key)?,
        }
        write!(f, " after {} byte(s): {}", self.written, self.source)
    }
}

impl std::error::Error for DestinationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// An aggregate of destination failures.
///
/// Returned by the parallel strategy, which attempts every destination
/// before reporting.
#[derive(Debug, Error)]
pub struct AggregateError {
    /// Collection of individual errors, ordered by destination key
    pub errors: Vec<DestinationError>,
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fan-out write failed on {} destination(s):", self.errors.len())?;
        for (i, e) in self.errors.iter().enumerate() {
            writeln!(f, "  #{}: {}", i + 1, e)?;
        }
        Ok(())
    }
}

impl AggregateError {
    /// Create a new aggregate error with a single error.
    pub fn single(error: DestinationError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Check if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DestinationError> {
        self.errors.iter()
    }

    /// Wrap into an `io::Error`.
    ///
    /// A single failure keeps its own kind, several collapse to `Other`.
    pub fn into_io(self) -> io::Error {
        let kind = match self.errors.as_slice() {
            [only] => only.kind(),
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, self)
    }
}

impl From<DestinationError> for AggregateError {
    fn from(error: DestinationError) -> Self {
        Self::single(error)
    }
}

/// Get the destination failure carried by a sequential write error.
pub fn destination_error(err: &io::Error) -> Option<&DestinationError> {
    err.get_ref()?.downcast_ref::<DestinationError>()
}

/// Get the aggregated failures carried by a parallel write error.
pub fn aggregate_error(err: &io::Error) -> Option<&AggregateError> {
    err.get_ref()?.downcast_ref::<AggregateError>()
}

/// Failure to parse a `Config`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "json")]
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "yaml")]
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[cfg(feature = "toml")]
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot read config: {0}")]
    Io(#[from] io::Error),
    #[error("unsupported config format: {0}")]
    Unsupported(String),
}

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;

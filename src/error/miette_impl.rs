//! Miette integration for pretty fan-out error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::{AggregateError, DestinationError};

/// A diagnostic wrapper for destination failures compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct WriteDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,

    #[related]
    /// Other destinations that failed during the same write
    pub related: Vec<WriteDiagnostic>,
}

impl From<DestinationError> for WriteDiagnostic {
    fn from(e: DestinationError) -> Self {
        let target = e.target.clone().unwrap_or_else(|| format!("#{}", e.key));
        WriteDiagnostic {
            message: format!("write to '{}' failed after {} byte(s)", target, e.written),
            source: Some(Box::new(e.source)),
            help: Some("Check that the destination is still open and writable".into()),
            severity: Severity::Error,
            related: Vec::new(),
        }
    }
}

impl From<AggregateError> for WriteDiagnostic {
    fn from(agg: AggregateError) -> Self {
        let count = agg.len();
        let mut errors = agg.errors.into_iter().map(WriteDiagnostic::from);
        match errors.next() {
            Some(mut first) if count > 1 => {
                first.message = format!("{} ({} destinations failed)", first.message, count);
                first.related = errors.collect();
                first
            }
            Some(first) => first,
            None => WriteDiagnostic {
                message: "Unknown fan-out error".into(),
                source: None,
                help: None,
                severity: Severity::Error,
                related: Vec::new(),
            },
        }
    }
}

impl From<AggregateError> for miette::Report {
    fn from(agg: AggregateError) -> Self {
        miette::Report::new(WriteDiagnostic::from(agg))
    }
}

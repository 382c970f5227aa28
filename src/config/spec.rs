//! Input and output descriptors.

use std::sync::Arc;

use crate::io::{InputProvider, OutputTarget};

/// Policy for opening an output target that already holds content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileExistsPolicy {
    /// Truncate existing content
    Overwrite,
    /// Append to existing content
    Append,
    #[default]
    /// Refuse to register the target
    Error,
}

impl FileExistsPolicy {
    /// Parse a policy from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Some(FileExistsPolicy::Overwrite),
            "append" => Some(FileExistsPolicy::Append),
            "error" => Some(FileExistsPolicy::Error),
            _ => None,
        }
    }
}

/// Describes an input to install with `Multi::set_input_spec`.
#[derive(Debug, Clone)]
pub struct InputSpec {
    /// Raw input argument or configuration string
    pub raw: String,
    /// The input provider implementation
    pub provider: Arc<dyn InputProvider>,
}

impl InputSpec {
    pub fn new(raw: impl Into<String>, provider: Arc<dyn InputProvider>) -> Self {
        Self {
            raw: raw.into(),
            provider,
        }
    }
}

/// Describes a destination to register with `Multi::add_output_spec`.
#[derive(Debug, Clone)]
pub struct OutputSpec {
    /// Raw output argument or configuration string
    pub raw: String,
    /// The output target implementation
    pub target: Arc<dyn OutputTarget>,
    /// Policy for targets that already hold content
    pub file_exists_policy: FileExistsPolicy,
}

impl OutputSpec {
    pub fn new(raw: impl Into<String>, target: Arc<dyn OutputTarget>) -> Self {
        Self {
            raw: raw.into(),
            target,
            file_exists_policy: FileExistsPolicy::default(),
        }
    }

    /// Set the file exists policy.
    pub fn with_file_exists_policy(mut self, policy: FileExistsPolicy) -> Self {
        self.file_exists_policy = policy;
        self
    }
}

//! Argument model for tee-style front ends.
//!
//! Output tokens:
//! - `-` or `stdout`: the process stdout
//! - `stderr`: the process stderr
//! - `@<path>`: a file, even when the path looks like a stream name
//! - anything else: a file path

use std::path::Path;
use std::sync::Arc;

use crate::builder::MultiBuilder;
use crate::config::{Config, FileExistsPolicy, OutputSpec};
use crate::error::ConfigError;
use crate::io::{ConsoleOutput, FileOutput, OutputTarget};

#[cfg(feature = "cli")]
mod sarge;

/// Output destinations named on the command line, normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputArgs(pub Vec<String>);

impl OutputArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, token: impl AsRef<str>) -> Self {
        self.0.push(normalize_output(token.as_ref()));
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_stdout(&self) -> bool {
        self.0.iter().any(|s| s == "-")
    }
}

/// Map stream aliases onto their canonical token.
pub fn normalize_output(token: &str) -> String {
    if token.starts_with('@') {
        return token.to_string();
    }
    if token == "-" || token.eq_ignore_ascii_case("stdout") {
        return "-".to_string();
    }
    if token.eq_ignore_ascii_case("stderr") {
        return "stderr".to_string();
    }
    token.to_string()
}

/// Everything a tee run needs besides the input.
#[derive(Debug, Clone, Default)]
pub struct TeeArgs {
    pub outputs: OutputArgs,
    /// Append to existing files instead of truncating them.
    pub append: bool,
    /// Start in parallel mode.
    pub parallel: bool,
    /// Let latency drive the mode.
    pub adaptive: bool,
    /// Path to a JSON/YAML/TOML `Config` document.
    pub config: Option<String>,
}

impl TeeArgs {
    pub fn file_exists_policy(&self) -> FileExistsPolicy {
        if self.append {
            FileExistsPolicy::Append
        } else {
            FileExistsPolicy::Overwrite
        }
    }

    /// One spec per output token, stdout included when named.
    pub fn output_specs(&self) -> Vec<OutputSpec> {
        let policy = self.file_exists_policy();
        self.outputs
            .as_slice()
            .iter()
            .map(|raw| OutputSpec::new(raw.clone(), output_target(raw)).with_file_exists_policy(policy))
            .collect()
    }

    /// The tuning from `--config`, or the default one.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        match &self.config {
            Some(path) => load_config_file(path),
            None => Ok(Config::default()),
        }
    }

    pub fn builder(&self) -> Result<MultiBuilder, ConfigError> {
        Ok(MultiBuilder::new()
            .with_config(self.load_config()?)
            .with_parallel(self.parallel)
            .with_adaptive(self.adaptive))
    }
}

/// Resolve a normalized output token into a target.
pub fn output_target(token: &str) -> Arc<dyn OutputTarget> {
    match token {
        "-" => Arc::new(ConsoleOutput::stdout()),
        "stderr" => Arc::new(ConsoleOutput::stderr()),
        other => Arc::new(FileOutput::new(other.strip_prefix('@').unwrap_or(other))),
    }
}

/// Read a config document, choosing the parser from the file extension.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string();
    let text = std::fs::read_to_string(path)?;
    Config::from_str_with_ext(&text, &ext)
}

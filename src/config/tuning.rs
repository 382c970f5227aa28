//! Tuning parameters for the adaptive mode controller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable tuning set, fixed when a `Multi` is built.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```yaml
/// threshold_latency: 2ms
/// minimal_writer: 4
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Write latency above which parallel fan-out is preferred.
    /// Zero means the default.
    #[serde(with = "humantime_serde")]
    pub threshold_latency: Duration,
    /// Parallel fan-out is never adopted with fewer destinations than this.
    /// Zero means the default.
    pub minimal_writer: usize,
    /// Payloads shorter than this are written sequentially even in parallel mode.
    pub minimal_size: usize,
    /// Feed one latency sample out of every `sample_write` writes to the controller.
    pub sample_write: u64,
    /// Return input close and destination flush failures from `Multi::close`
    /// instead of only logging them.
    pub report_close_errors: bool,
    /// Serialize concurrent `write` calls on one instance.
    pub serialize_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold_latency: Duration::from_millis(5),
            minimal_writer: 3,
            minimal_size: 1024,
            sample_write: 1,
            report_close_errors: false,
            serialize_writes: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold_latency(mut self, threshold: Duration) -> Self {
        self.threshold_latency = threshold;
        self
    }

    pub fn with_minimal_writer(mut self, count: usize) -> Self {
        self.minimal_writer = count;
        self
    }

    pub fn with_minimal_size(mut self, bytes: usize) -> Self {
        self.minimal_size = bytes;
        self
    }

    pub fn with_sample_write(mut self, every: u64) -> Self {
        self.sample_write = every;
        self
    }

    pub fn with_report_close_errors(mut self, report: bool) -> Self {
        self.report_close_errors = report;
        self
    }

    pub fn with_serialize_writes(mut self, serialize: bool) -> Self {
        self.serialize_writes = serialize;
        self
    }

    /// Sampling cadence with 0 read as "every write".
    pub fn sample_every(&self) -> u64 {
        self.sample_write.max(1)
    }

    /// Switch threshold, with zero read as the default.
    pub fn threshold(&self) -> Duration {
        if self.threshold_latency.is_zero() {
            Self::default().threshold_latency
        } else {
            self.threshold_latency
        }
    }

    /// Parallel eligibility floor, with zero read as the default.
    pub fn writer_floor(&self) -> usize {
        match self.minimal_writer {
            0 => Self::default().minimal_writer,
            n => n,
        }
    }

    #[cfg(feature = "json")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a config document, picking the format from a file extension.
    #[cfg_attr(
        not(any(feature = "json", feature = "yaml", feature = "toml")),
        allow(unused_variables)
    )]
    pub fn from_str_with_ext(s: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext.to_ascii_lowercase().as_str() {
            #[cfg(feature = "json")]
            "json" => Self::from_json_str(s),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Self::from_yaml_str(s),
            #[cfg(feature = "toml")]
            "toml" => Self::from_toml_str(s),
            _ => Err(ConfigError::Unsupported(ext.to_string())),
        }
    }
}

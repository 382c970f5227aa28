//! Builder for creating `Multi` instances.

use crate::config::Config;
use crate::fanout::Mode;
use crate::multi::Multi;

/// Chooses the tuning and the starting mode of a [`Multi`].
///
/// Without `with_adaptive(true)` the starting mode is sticky: the
/// controller never switches on its own.
///
/// ```
/// use std::time::Duration;
/// use multiio::{Config, MultiBuilder};
///
/// let multi = MultiBuilder::new()
///     .with_config(Config::default().with_threshold_latency(Duration::from_millis(2)))
///     .with_adaptive(true)
///     .build();
///
/// assert!(multi.is_adaptive());
/// assert!(multi.is_sequential());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MultiBuilder {
    config: Config,
    adaptive: bool,
    mode: Mode,
}

impl MultiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Let the controller switch modes from observed latency.
    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `with_mode(Mode::Parallel)` or `with_mode(Mode::Sequential)`.
    pub fn with_parallel(self, parallel: bool) -> Self {
        self.with_mode(if parallel {
            Mode::Parallel
        } else {
            Mode::Sequential
        })
    }

    pub fn build(self) -> Multi {
        Multi::from_parts(self.config, self.adaptive, self.mode)
    }
}

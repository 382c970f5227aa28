//! Latency-driven switching between sequential and parallel fan-out.
//!
//! Two states with asymmetric transitions:
//!
//! ```text
//!              latency > threshold && writers >= minimal_writer
//! Sequential  ------------------------------------------------->  Parallel
//!             <-------------------------------------------------
//!                            latency < threshold
//! ```
//!
//! Each decision uses only the latest sampled latency and the writer count
//! recorded at the last rebuild. Nothing moves while `adaptive` is off.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::Config;
use crate::fanout::Mode;

#[derive(Debug)]
pub struct ModeController {
    adaptive: AtomicBool,
    parallel: AtomicBool,
    writers: AtomicUsize,
    samples: AtomicU64,
    last_latency_ns: AtomicU64,
    threshold: Duration,
    minimal_writer: usize,
    sample_every: u64,
}

impl ModeController {
    pub fn new(config: &Config, adaptive: bool, mode: Mode) -> Self {
        Self {
            adaptive: AtomicBool::new(adaptive),
            parallel: AtomicBool::new(mode == Mode::Parallel),
            writers: AtomicUsize::new(0),
            samples: AtomicU64::new(0),
            last_latency_ns: AtomicU64::new(0),
            threshold: config.threshold(),
            minimal_writer: config.writer_floor(),
            sample_every: config.sample_every(),
        }
    }

    pub fn is_adaptive(&self) -> bool {
        self.adaptive.load(Ordering::Acquire)
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel.load(Ordering::Acquire)
    }

    pub fn mode(&self) -> Mode {
        if self.is_parallel() {
            Mode::Parallel
        } else {
            Mode::Sequential
        }
    }

    /// Writer count seen by the last rebuild.
    pub fn writers(&self) -> usize {
        self.writers.load(Ordering::Acquire)
    }

    pub(crate) fn set_writers(&self, count: usize) {
        self.writers.store(count, Ordering::Release);
    }

    /// Latency of the most recent sampled write.
    pub fn last_latency(&self) -> Duration {
        Duration::from_nanos(self.last_latency_ns.load(Ordering::Relaxed))
    }

    /// Feed one write latency.
    ///
    /// Returns the new mode when this sample caused a transition; the caller
    /// must then rebuild the output. Concurrent samples race on a
    /// compare-exchange, so each transition is reported once.
    pub fn observe(&self, elapsed: Duration) -> Option<Mode> {
        if !self.is_adaptive() {
            return None;
        }

        let seen = self.samples.fetch_add(1, Ordering::Relaxed) + 1;
        if seen % self.sample_every != 0 {
            return None;
        }

        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.last_latency_ns.store(nanos, Ordering::Relaxed);
        trace!(latency = ?elapsed, "latency sample");

        if self.is_parallel() {
            if elapsed < self.threshold && self.switch(true, false) {
                debug!(latency = ?elapsed, threshold = ?self.threshold, "switching to sequential fan-out");
                return Some(Mode::Sequential);
            }
        } else {
            let writers = self.writers();
            if writers >= self.minimal_writer && elapsed > self.threshold && self.switch(false, true) {
                debug!(latency = ?elapsed, writers, threshold = ?self.threshold, "switching to parallel fan-out");
                return Some(Mode::Parallel);
            }
        }
        None
    }

    /// Forget sampling progress; an adaptive controller restarts sequential.
    pub(crate) fn reset(&self) {
        if self.is_adaptive() {
            self.parallel.store(false, Ordering::Release);
        }
        self.samples.store(0, Ordering::Relaxed);
        self.last_latency_ns.store(0, Ordering::Relaxed);
    }

    fn switch(&self, from: bool, to: bool) -> bool {
        self.parallel
            .compare_exchange(from, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

//! Fan-out strategies.
//!
//! A [`FanOut`] is an immutable snapshot: the destination list is frozen at
//! construction, and changing the registry or the mode builds a new one.
//! Callers already holding a `FanOut` keep writing to the old list.
//!
//! - **Sequential**: destinations are written one at a time in registration
//!   order and the first failure aborts the call.
//! - **Parallel**: every destination is written on its own scoped thread,
//!   the call joins all of them, and failures are aggregated.

mod parallel;
mod sequential;

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use crate::error::{AggregateError, DestinationError};
use crate::registry::Destination;

/// Active fan-out strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Sequential,
    Parallel,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Sequential => write!(f, "sequential"),
            Mode::Parallel => write!(f, "parallel"),
        }
    }
}

/// Receives the wall-clock duration of every fan-out write.
pub trait LatencyObserver: Send + Sync {
    fn observe(&self, elapsed: Duration);
}

/// A frozen set of destinations plus the strategy used to write to them.
pub struct FanOut {
    mode: Mode,
    destinations: Vec<Arc<Destination>>,
    minimal_size: usize,
    observer: Option<Weak<dyn LatencyObserver>>,
}

impl FanOut {
    pub fn new(mode: Mode, destinations: Vec<Arc<Destination>>, minimal_size: usize) -> Self {
        Self {
            mode,
            destinations,
            minimal_size,
            observer: None,
        }
    }

    /// A sequential fan-out with no destination; every write is discarded.
    pub fn discard() -> Self {
        Self::new(Mode::Sequential, Vec::new(), 0)
    }

    pub(crate) fn with_observer(mut self, observer: Weak<dyn LatencyObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Keys of the destinations, in write order for the sequential strategy.
    pub fn keys(&self) -> Vec<u64> {
        self.destinations.iter().map(|d| d.key()).collect()
    }

    /// Deliver `buf` to every destination.
    ///
    /// Returns `buf.len()` when every destination accepted the whole
    /// payload. The elapsed time is reported to the observer whether the
    /// write succeeded or not.
    pub fn write_payload(&self, buf: &[u8]) -> io::Result<usize> {
        let start = Instant::now();
        let result = if self.dispatches_in_parallel(buf.len()) {
            parallel::write(&self.destinations, buf)
        } else {
            sequential::write(&self.destinations, buf)
        };
        self.report(start.elapsed());
        result
    }

    /// Flush every destination, attempting all of them.
    pub fn flush_all(&self) -> Result<(), AggregateError> {
        let errors: Vec<DestinationError> = self
            .destinations
            .iter()
            .filter_map(|d| d.flush().err())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AggregateError { errors })
        }
    }

    // A single destination gains nothing from a thread of its own.
    fn dispatches_in_parallel(&self, size: usize) -> bool {
        self.mode == Mode::Parallel && size >= self.minimal_size && self.destinations.len() > 1
    }

    fn report(&self, elapsed: Duration) {
        if let Some(observer) = self.observer.as_ref().and_then(Weak::upgrade) {
            observer.observe(elapsed);
        }
    }
}

impl fmt::Debug for FanOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOut")
            .field("mode", &self.mode)
            .field("destinations", &self.keys())
            .field("minimal_size", &self.minimal_size)
            .finish()
    }
}

impl Write for &FanOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_payload(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_all().map_err(AggregateError::into_io)
    }
}

impl Write for FanOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self).flush()
    }
}

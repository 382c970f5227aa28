//! The `Multi` facade: one input, many destinations.

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tracing::{debug, warn};

use crate::builder::MultiBuilder;
use crate::config::{Config, FileExistsPolicy, InputSpec, OutputSpec};
use crate::controller::ModeController;
use crate::error::AggregateError;
use crate::fanout::{FanOut, LatencyObserver, Mode};
use crate::io::{NopCloser, ReadCloser};
use crate::registry::{Destination, WriterRegistry};
use crate::slot::{InputHandle, InputSlot, OutputSlot};

const COPY_BUFFER_SIZE: usize = 32 * 1024;

/// Reads from one swappable input and writes every byte to all registered
/// destinations, switching between sequential and parallel fan-out.
///
/// All operations take `&self`; share an instance across threads with
/// `Arc<Multi>` or scoped borrows. Registration never blocks in-flight
/// writes, which finish on the fan-out they started with. Replacing the
/// input does not interrupt a read in progress either, but the replacing
/// call waits for that read to return before it closes the old input.
///
/// ```
/// use multiio::{InMemorySink, Multi};
///
/// let a = InMemorySink::new("a");
/// let b = InMemorySink::new("b");
///
/// let multi = Multi::new();
/// multi.add_writer(a.writer());
/// multi.add_writer(b.writer());
///
/// assert_eq!(multi.write(b"hi").unwrap(), 2);
/// assert_eq!(a.contents(), b"hi");
/// assert_eq!(b.contents(), b"hi");
/// ```
pub struct Multi {
    shared: Arc<Shared>,
}

struct Shared {
    me: Weak<Shared>,
    config: Config,
    registry: WriterRegistry,
    input: InputSlot,
    output: OutputSlot,
    controller: ModeController,
    rebuild_lock: Mutex<()>,
    write_lock: Option<Mutex<()>>,
}

impl Shared {
    /// Build a fan-out from the current registry and mode, then publish it.
    ///
    /// Rebuilds are serialized among themselves so the last one published
    /// always reflects the latest registry and mode.
    fn rebuild(&self) {
        self.update(|_| ());
    }

    /// Change the registry and publish the matching fan-out as one step.
    ///
    /// Registration, cleaning and resetting all go through here, so a reset
    /// never interleaves with an insert.
    fn update<T>(&self, change: impl FnOnce(&Self) -> T) -> T {
        let _guard = self
            .rebuild_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let out = change(self);
        self.publish();
        out
    }

    fn publish(&self) {
        let destinations = self.registry.snapshot();
        let writers = destinations.len();
        self.controller.set_writers(writers);
        let mode = self.controller.mode();

        let observer: Weak<dyn LatencyObserver> = self.me.clone();
        let fanout = FanOut::new(mode, destinations, self.config.minimal_size).with_observer(observer);
        self.output.store(fanout);
        debug!(%mode, writers, "fan-out rebuilt");
    }
}

impl LatencyObserver for Shared {
    fn observe(&self, elapsed: Duration) {
        if self.controller.observe(elapsed).is_some() {
            self.rebuild();
        }
    }
}

impl Multi {
    /// Non-adaptive, sequential, default [`Config`].
    pub fn new() -> Self {
        MultiBuilder::new().build()
    }

    /// Non-adaptive and sequential with the given tuning.
    pub fn with_config(config: Config) -> Self {
        MultiBuilder::new().with_config(config).build()
    }

    pub fn builder() -> MultiBuilder {
        MultiBuilder::new()
    }

    pub(crate) fn from_parts(config: Config, adaptive: bool, mode: Mode) -> Self {
        let shared = Arc::new_cyclic(|me| Shared {
            me: me.clone(),
            controller: ModeController::new(&config, adaptive, mode),
            write_lock: config.serialize_writes.then(|| Mutex::new(())),
            config,
            registry: WriterRegistry::new(),
            input: InputSlot::new(),
            output: OutputSlot::new(),
            rebuild_lock: Mutex::new(()),
        });
        shared.rebuild();
        Self { shared }
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Register a destination and return its key.
    ///
    /// The fan-out is rebuilt before this returns, so the next write
    /// reaches `writer`.
    pub fn add_writer<W>(&self, writer: W) -> u64
    where
        W: Write + Send + 'static,
    {
        self.shared
            .update(|s| s.registry.insert(Box::new(writer), None))
    }

    /// Register several destinations with a single rebuild.
    ///
    /// Absent writers have no Rust counterpart here; filter an iterator of
    /// `Option<W>` with `.flatten()` before passing it.
    pub fn add_writers<I, W>(&self, writers: I) -> Vec<u64>
    where
        I: IntoIterator<Item = W>,
        W: Write + Send + 'static,
    {
        let writers: Vec<_> = writers.into_iter().collect();
        self.shared.update(|s| {
            writers
                .into_iter()
                .map(|w| s.registry.insert(Box::new(w), None))
                .collect()
        })
    }

    /// Open an output target according to its policy and register it.
    pub fn add_output_spec(&self, spec: &OutputSpec) -> io::Result<u64> {
        let writer = match spec.file_exists_policy {
            FileExistsPolicy::Overwrite => spec.target.open_overwrite()?,
            FileExistsPolicy::Append => spec.target.open_append()?,
            FileExistsPolicy::Error => {
                if spec.target.exists() {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("output '{}' already exists", spec.raw),
                    ));
                }
                spec.target.open_overwrite()?
            }
        };
        let target = Some(spec.target.id().to_owned());
        Ok(self.shared.update(|s| s.registry.insert(writer, target)))
    }

    /// Drop every destination; later writes are discarded.
    ///
    /// Removed destinations are flushed, and flush failures are logged.
    pub fn clean(&self) {
        let removed = self.shared.update(|s| s.registry.clear());
        if let Err(e) = flush_removed(&removed) {
            warn!(error = %e, "flush failed while cleaning destinations");
        }
    }

    /// Install a new input and close the one it replaces.
    ///
    /// A failure to close the previous input is logged, never returned.
    /// If another thread is inside a read on the previous input, this waits
    /// for that read to return before closing it.
    pub fn set_input<R>(&self, reader: R)
    where
        R: ReadCloser + 'static,
    {
        self.swap_input(InputHandle::new(Box::new(reader)));
    }

    /// Go back to the empty input, closing the current one.
    pub fn reset_input(&self) {
        self.swap_input(InputHandle::discard());
    }

    /// Open an input provider and install it.
    pub fn set_input_spec(&self, spec: &InputSpec) -> io::Result<()> {
        let reader = spec.provider.open()?;
        self.set_input(NopCloser::new(reader));
        Ok(())
    }

    fn swap_input(&self, next: InputHandle) {
        let previous = self.shared.input.replace(next);
        if let Err(e) = previous.close() {
            warn!(error = %e, "failed to close replaced input");
        }
    }

    /// Read from the current input.
    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.shared.input.load().read_from(buf)
    }

    /// Write `buf` to every destination through the current fan-out.
    pub fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let _guard = self
            .shared
            .write_lock
            .as_ref()
            .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner));
        self.shared.output.load().write_payload(buf)
    }

    pub fn write_str(&self, s: &str) -> io::Result<usize> {
        self.write(s.as_bytes())
    }

    /// Flush every current destination.
    pub fn flush(&self) -> io::Result<()> {
        self.shared
            .output
            .load()
            .flush_all()
            .map_err(AggregateError::into_io)
    }

    /// Stream the current input to the destinations until end of input.
    ///
    /// Returns the number of bytes copied, or the first read or write error.
    pub fn copy(&self) -> io::Result<u64> {
        let input = self.shared.input.load();
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut total: u64 = 0;
        loop {
            let n = match input.read_from(&mut buf) {
                Ok(0) => return Ok(total),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let written = self.write(&buf[..n])?;
            if written != n {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "short write"));
            }
            total += n as u64;
        }
    }

    /// Release the input and forget every destination.
    ///
    /// Keys restart from zero. An adaptive instance also drops back to
    /// sequential mode. The instance stays usable afterwards.
    pub fn close(&self) -> io::Result<()> {
        let previous = self.shared.input.replace(InputHandle::discard());
        let closed = previous.close();

        let removed = self.shared.update(|s| {
            s.controller.reset();
            s.registry.reset()
        });
        let flushed = flush_removed(&removed);

        if self.shared.config.report_close_errors {
            if let Err(e) = closed {
                if let Err(flush) = flushed {
                    warn!(error = %flush, "flush failed while closing destinations");
                }
                return Err(e);
            }
            return flushed.map_err(AggregateError::into_io);
        }
        if let Err(e) = closed {
            warn!(error = %e, "failed to close input");
        }
        if let Err(e) = flushed {
            warn!(error = %e, "flush failed while closing destinations");
        }
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        self.shared.controller.mode()
    }

    pub fn is_parallel(&self) -> bool {
        self.shared.controller.is_parallel()
    }

    pub fn is_sequential(&self) -> bool {
        !self.is_parallel()
    }

    pub fn is_adaptive(&self) -> bool {
        self.shared.controller.is_adaptive()
    }

    /// Latency of the last write the controller sampled.
    pub fn last_latency(&self) -> Duration {
        self.shared.controller.last_latency()
    }

    /// The current input.
    pub fn reader(&self) -> Arc<InputHandle> {
        self.shared.input.load()
    }

    /// The current fan-out.
    pub fn writer(&self) -> Arc<FanOut> {
        self.shared.output.load()
    }

    /// Number of registered destinations.
    pub fn len(&self) -> usize {
        self.shared.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.registry.is_empty()
    }
}

fn flush_removed(removed: &[Arc<Destination>]) -> Result<(), AggregateError> {
    let errors: Vec<_> = removed.iter().filter_map(|d| d.flush().err()).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AggregateError { errors })
    }
}

impl Default for Multi {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Multi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multi")
            .field("mode", &self.mode())
            .field("adaptive", &self.is_adaptive())
            .field("destinations", &self.len())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl Read for &Multi {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Multi::read(*self, buf)
    }
}

impl Read for Multi {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Multi::read(self, buf)
    }
}

impl Write for &Multi {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Multi::write(*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Multi::flush(*self)
    }
}

impl Write for Multi {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Multi::write(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Multi::flush(self)
    }
}

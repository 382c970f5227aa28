//! Concurrent registry of fan-out destinations.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;

use crate::error::DestinationError;

/// One registered destination writer.
///
/// The writer sits behind its own mutex, so strategies built from different
/// snapshots, and concurrent callers, never interleave inside one write.
pub struct Destination {
    key: u64,
    target: Option<String>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Destination {
    fn new(key: u64, target: Option<String>, writer: Box<dyn Write + Send>) -> Self {
        Self {
            key,
            target,
            writer: Mutex::new(writer),
        }
    }

    pub fn key(&self) -> u64 {
        self.key
    }

    /// Identifier of the `OutputTarget` this destination was opened from.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver the whole payload, reporting how far it got on failure.
    pub(crate) fn deliver(&self, mut buf: &[u8]) -> Result<(), DestinationError> {
        let mut writer = self.lock();
        let mut written = 0;
        while !buf.is_empty() {
            match writer.write(buf) {
                Ok(0) => {
                    return Err(self.fail(
                        written,
                        io::Error::new(io::ErrorKind::WriteZero, "destination accepted no bytes"),
                    ));
                }
                Ok(n) => {
                    written += n;
                    buf = &buf[n..];
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.fail(written, e)),
            }
        }
        Ok(())
    }

    pub(crate) fn flush(&self) -> Result<(), DestinationError> {
        self.lock().flush().map_err(|e| self.fail(0, e))
    }

    fn fail(&self, written: usize, source: io::Error) -> DestinationError {
        DestinationError {
            key: self.key,
            target: self.target.clone(),
            written,
            source,
        }
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("key", &self.key)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Key-to-writer mapping with monotonically increasing keys.
///
/// Only the rebuild path reads it, through [`WriterRegistry::snapshot`].
#[derive(Debug, Default)]
pub struct WriterRegistry {
    entries: DashMap<u64, Arc<Destination>>,
    next_key: AtomicU64,
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a writer under the next key and return that key.
    pub fn insert(&self, writer: Box<dyn Write + Send>, target: Option<String>) -> u64 {
        let key = self.next_key.fetch_add(1, Ordering::Relaxed);
        self.entries
            .insert(key, Arc::new(Destination::new(key, target, writer)));
        key
    }

    /// Remove every entry, returning what was removed in key order.
    ///
    /// The key counter keeps running.
    pub fn clear(&self) -> Vec<Arc<Destination>> {
        let keys: Vec<u64> = self.entries.iter().map(|e| *e.key()).collect();
        let mut removed: Vec<Arc<Destination>> = keys
            .into_iter()
            .filter_map(|k| self.entries.remove(&k).map(|(_, d)| d))
            .collect();
        removed.sort_by_key(|d| d.key);
        removed
    }

    /// Remove every entry and restart keys from zero.
    ///
    /// Not atomic with respect to [`insert`](Self::insert): callers must not
    /// run the two concurrently, or a key can be handed out twice.
    pub fn reset(&self) -> Vec<Arc<Destination>> {
        let removed = self.clear();
        self.next_key.store(0, Ordering::Relaxed);
        removed
    }

    /// Destinations in registration order.
    pub fn snapshot(&self) -> Vec<Arc<Destination>> {
        let mut list: Vec<Arc<Destination>> =
            self.entries.iter().map(|e| Arc::clone(e.value())).collect();
        list.sort_by_key(|d| d.key);
        list
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Atomically swappable holders for the current input and output.
//!
//! Both slots hold an `Arc` to an immutable value. Replacing one never
//! waits for in-flight calls: those finish on the value they loaded.

use std::fmt;
use std::io::{self, Read};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;

use crate::fanout::FanOut;
use crate::io::{DiscardCloser, ReadCloser};

/// Exclusive owner of one input reader.
///
/// Once closed, the reader is released and further reads return 0.
pub struct InputHandle {
    reader: Mutex<Option<Box<dyn ReadCloser>>>,
}

impl InputHandle {
    pub fn new(reader: Box<dyn ReadCloser>) -> Self {
        Self {
            reader: Mutex::new(Some(reader)),
        }
    }

    pub fn discard() -> Self {
        Self::new(Box::new(DiscardCloser))
    }

    fn lock(&self) -> MutexGuard<'_, Option<Box<dyn ReadCloser>>> {
        self.reader.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read_from(&self, buf: &mut [u8]) -> io::Result<usize> {
        match self.lock().as_mut() {
            Some(reader) => reader.read(buf),
            None => Ok(0),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    /// Close the reader. Only the first call reaches it.
    ///
    /// Waits for a read in progress on another thread to return first.
    pub fn close(&self) -> io::Result<()> {
        let taken = self.lock().take();
        match taken {
            Some(mut reader) => reader.close(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for InputHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputHandle")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Read for &InputHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_from(buf)
    }
}

/// Holds the current [`InputHandle`]; starts on a discard reader.
pub struct InputSlot {
    current: ArcSwap<InputHandle>,
}

impl InputSlot {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(InputHandle::discard()),
        }
    }

    pub fn load(&self) -> Arc<InputHandle> {
        self.current.load_full()
    }

    /// Install `next` and hand back the handle it replaced.
    pub fn replace(&self, next: InputHandle) -> Arc<InputHandle> {
        self.current.swap(Arc::new(next))
    }
}

impl Default for InputSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InputSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InputSlot").field(&*self.current.load()).finish()
    }
}

/// Holds the current [`FanOut`]; starts on a discard fan-out.
pub struct OutputSlot {
    current: ArcSwap<FanOut>,
}

impl OutputSlot {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(FanOut::discard()),
        }
    }

    pub fn load(&self) -> Arc<FanOut> {
        self.current.load_full()
    }

    pub fn store(&self, next: FanOut) {
        self.current.store(Arc::new(next));
    }
}

impl Default for OutputSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OutputSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OutputSlot").field(&*self.current.load()).finish()
    }
}

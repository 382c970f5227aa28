//! Output target trait definition.

use std::fmt::Debug;
use std::io::Write;

/// Trait for synchronous output targets.
///
/// A target opens a writable stream that is then registered as a fan-out
/// destination, e.g. a file, stdout/stderr, or an in-memory buffer.
pub trait OutputTarget: Send + Sync + Debug {
    /// Returns a unique identifier for this output target.
    ///
    /// Carried in `DestinationError::target` and log events.
    /// Convention: "-" for stdout, file path for files.
    fn id(&self) -> &str;

    /// Open the target for writing, truncating any existing content.
    fn open_overwrite(&self) -> std::io::Result<Box<dyn Write + Send>>;

    /// Open the target for appending to existing content.
    fn open_append(&self) -> std::io::Result<Box<dyn Write + Send>>;

    /// Whether the target already holds content that opening would clobber.
    ///
    /// Streams such as stdout never exist in this sense.
    fn exists(&self) -> bool {
        false
    }
}

//! I/O contracts and endpoints consumed by the fan-out engine.
//!
//! This module provides:
//! - `ReadCloser`: Input sources that own a releasable resource
//! - `InputProvider` / `OutputTarget`: Openers for inputs and destinations
//! - Standard implementations for files, stdin/stdout/stderr
//! - In-memory implementations for testing

mod closer;
mod input;
mod memory;
mod output;
mod std_io;

pub use closer::{DiscardCloser, NopCloser, ReadCloser};
pub use input::InputProvider;
pub use memory::{InMemorySink, InMemorySource, InMemoryWriter};
pub use output::OutputTarget;
pub use std_io::{ConsoleOutput, ConsoleStream, FileInput, FileOutput, StdinInput};

//! # multiio
//!
//! Adaptive multi-destination I/O fan-out for CLI and server applications.
//!
//! ## Overview
//!
//! A [`Multi`] reads from one swappable input and writes the same bytes to
//! a dynamic set of destination writers:
//! - **Writer registry**: destinations are added and cleared at any time,
//!   concurrently with in-flight writes
//! - **Sequential fan-out**: destinations written in registration order,
//!   first failure aborts the call
//! - **Parallel fan-out**: one scoped thread per destination, joined before
//!   returning, failures aggregated
//! - **Adaptive mode**: write latency drives the switch between the two,
//!   with a writer-count gate and hysteresis
//! - **Swappable input**: replacing the input closes the previous one
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::Cursor;
//! use multiio::{Config, InMemorySink, MultiBuilder, NopCloser};
//!
//! let copy_a = InMemorySink::new("a");
//! let copy_b = InMemorySink::new("b");
//!
//! let multi = MultiBuilder::new()
//!     .with_config(Config::default())
//!     .with_adaptive(true)
//!     .build();
//! multi.add_writers([copy_a.writer(), copy_b.writer()]);
//! multi.set_input(NopCloser::new(Cursor::new(b"payload".to_vec())));
//!
//! let copied = multi.copy().unwrap();
//! assert_eq!(copied, 7);
//! assert_eq!(copy_a.contents(), b"payload");
//! assert_eq!(copy_b.contents(), b"payload");
//! ```
//!
//! ## Concurrency semantics
//!
//! - Every operation takes `&self` and blocks until its effect is visible.
//! - Registry changes and mode switches publish a new immutable [`FanOut`]
//!   through an atomic swap. Writes already running keep the fan-out they
//!   loaded; the next write sees the new one.
//! - Writes from concurrent callers are not ordered relative to each other
//!   unless [`Config::serialize_writes`] is set.
//! - There are no timeouts. A destination that blocks stalls its write.
//!
//! ## Features
//!
//! - `json` - load `Config` from JSON (enabled by default)
//! - `yaml` - load `Config` from YAML
//! - `toml` - load `Config` from TOML
//! - `miette` - Pretty error reporting with miette
//! - `cli` - the `multiio_tee` binary

pub mod builder;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod fanout;
pub mod io;
pub mod multi;
pub mod registry;
pub mod slot;

// Re-exports for convenience
pub use builder::MultiBuilder;
pub use config::{Config, FileExistsPolicy, InputSpec, OutputSpec};
pub use error::{AggregateError, ConfigError, DestinationError, aggregate_error, destination_error};
pub use fanout::{FanOut, LatencyObserver, Mode};
pub use io::{
    ConsoleOutput, DiscardCloser, FileInput, FileOutput, InMemorySink, InMemorySource,
    InMemoryWriter, InputProvider, NopCloser, OutputTarget, ReadCloser, StdinInput,
};
pub use multi::Multi;
pub use slot::InputHandle;

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::WriteDiagnostic;

//! Configuration types.
//!
//! This module provides:
//! - `Config`: Tuning parameters for the adaptive fan-out
//! - `InputSpec` / `OutputSpec`: Descriptors for inputs and destinations
//! - `FileExistsPolicy`: Policy for handling existing output targets

mod spec;
mod tuning;

pub use spec::{FileExistsPolicy, InputSpec, OutputSpec};
pub use tuning::Config;

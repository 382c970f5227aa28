//! Concurrent, collect-all delivery.

use std::io;
use std::sync::Arc;
use std::thread;

use crate::error::{AggregateError, DestinationError};
use crate::registry::Destination;

/// Deliver `buf` to every destination on its own scoped thread and join.
///
/// Every destination is attempted. Failures are gathered into one
/// [`AggregateError`], ordered by key.
pub(crate) fn write(destinations: &[Arc<Destination>], buf: &[u8]) -> io::Result<usize> {
    let errors: Vec<DestinationError> = thread::scope(|scope| {
        let handles: Vec<_> = destinations
            .iter()
            .map(|dest| (dest, scope.spawn(move || dest.deliver(buf))))
            .collect();

        handles
            .into_iter()
            .filter_map(|(dest, handle)| match handle.join() {
                Ok(result) => result.err(),
                Err(_) => Some(DestinationError {
                    key: dest.key(),
                    target: dest.target().map(str::to_owned),
                    written: 0,
                    source: io::Error::other("destination writer panicked"),
                }),
            })
            .collect()
    });

    if errors.is_empty() {
        Ok(buf.len())
    } else {
        Err(AggregateError { errors }.into_io())
    }
}

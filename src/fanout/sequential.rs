//! In-order, fail-fast delivery.

use std::io;
use std::sync::Arc;

use crate::error::DestinationError;
use crate::registry::Destination;

/// Deliver `buf` to each destination in turn.
///
/// The first failing destination ends the call. Destinations after it are
/// not attempted, and the error keeps the failing destination's kind.
pub(crate) fn write(destinations: &[Arc<Destination>], buf: &[u8]) -> io::Result<usize> {
    for dest in destinations {
        dest.deliver(buf).map_err(DestinationError::into_io)?;
    }
    Ok(buf.len())
}

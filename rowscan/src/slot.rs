//! Per-row element slots handed out by repeated destinations.

use rowscan_result::Result;

use crate::channel::Sink;

/// The destination for one row of a repeated destination.
///
/// Sequences append their element up front and hand out a reference to it.
/// Channels hand out an owned element that is sent when the slot is
/// committed, after the row has been fully bound.
pub enum Slot<'a, T> {
    Appended(&'a mut T),
    Pending { element: T, sink: &'a dyn Sink<T> },
}

impl<'a, T> Slot<'a, T> {
    pub fn target(&mut self) -> &mut T {
        match self {
            Slot::Appended(element) => element,
            Slot::Pending { element, .. } => element,
        }
    }

    /// Finishes the row. Pending elements are delivered to their sink.
    pub fn commit(self) -> Result<()> {
        match self {
            Slot::Appended(_) => Ok(()),
            Slot::Pending { element, sink } => sink.deliver(element),
        }
    }
}

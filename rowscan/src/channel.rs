//! Channel senders as destinations.
//!
//! A sender of `T` receives one freshly bound `T` per row. Sends block as the
//! channel dictates: a rendezvous or bounded channel waits for the consumer,
//! an unbounded one does not. A dropped receiver ends the scan with
//! [`Error::ChannelClosed`].

use std::sync::mpsc;

use crossbeam_channel as xchan;
use rowscan_result::{Error, Result};
use rowscan_types::Column;

use crate::buffer::ScanTarget;
use crate::container::check_dimension;
use crate::destination::Destination;
use crate::fields::{FieldTable, Leaf};
use crate::shape::Shape;
use crate::slot::Slot;

/// Delivery endpoint for pending slots.
pub trait Sink<T> {
    fn deliver(&self, element: T) -> Result<()>;
}

impl<T> Sink<T> for mpsc::Sender<T> {
    fn deliver(&self, element: T) -> Result<()> {
        self.send(element).map_err(|_| Error::ChannelClosed)
    }
}

impl<T> Sink<T> for mpsc::SyncSender<T> {
    fn deliver(&self, element: T) -> Result<()> {
        self.send(element).map_err(|_| Error::ChannelClosed)
    }
}

impl<T> Sink<T> for xchan::Sender<T> {
    fn deliver(&self, element: T) -> Result<()> {
        self.send(element).map_err(|_| Error::ChannelClosed)
    }
}

macro_rules! impl_channel_destination {
    ($($sender:ty),*) => {
        $(
            impl<T: Destination> Destination for $sender {
                const SHAPE: Shape = Shape::Channel;
                const DIMENSION: usize = 1 + T::DIMENSION;
                type Element = T;

                fn validate() -> Result<()> {
                    if T::DIMENSION == 0 {
                        return Err(Error::unsupported(
                            Self::type_name(),
                            "channel elements must be records or containers",
                        ));
                    }
                    check_dimension::<Self>()?;
                    T::validate()
                }

                fn next_slot(&mut self) -> Result<Slot<'_, T>> {
                    Ok(Slot::Pending {
                        element: T::allocate()?,
                        sink: self,
                    })
                }

                fn scan_targets<'a>(
                    &'a mut self,
                    _columns: &[Column],
                ) -> Result<Vec<ScanTarget<'a>>> {
                    Err(Error::InvalidDimension {
                        operation: "scan_targets",
                        dimension: Self::DIMENSION,
                    })
                }

                fn resolve_fields<'a>(&'a mut self, key: &str, table: &mut FieldTable<'a>) {
                    table.insert(key, Leaf::Unsupported(Self::type_name()));
                }
            }
        )*
    };
}

impl_channel_destination!(mpsc::Sender<T>, mpsc::SyncSender<T>, xchan::Sender<T>);

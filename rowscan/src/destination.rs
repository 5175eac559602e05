//! The [`Destination`] trait and its pointer-like implementations.
//!
//! Every type the scanner can fill implements [`Destination`]. The trait
//! carries the static classification used by [`TypeShape`](crate::TypeShape)
//! together with the three operations the binder performs on a live value:
//! producing the next element slot, producing per-row scan targets, and
//! materializing scratch values after a row has been scanned.
//!
//! `Box<T>` and `Option<T>` are transparent: they report the shape and
//! dimension of `T`, and `Option<T>` allocates its inner value on first use.
//! `Rc<T>` and `Arc<T>` are transparent as long as the handle is unique.

use std::rc::Rc;
use std::sync::Arc;

use rowscan_result::{Error, Result};
use rowscan_types::{Column, Value};

use crate::buffer::{ScanTarget, ScannedRow};
use crate::cell::ScanCell;
use crate::fields::{FieldTable, Leaf};
use crate::shape::Shape;
use crate::slot::Slot;

/// A value that rows can be bound into.
///
/// Implementations are provided for scalars, `Vec<T>`, `HashMap<K, V>`,
/// `BTreeMap<K, V>`, channel senders, `Box<T>`, `Option<T>`, `Rc<T>` and
/// `Arc<T>`. Records implement it through [`record!`](crate::record), and
/// additional scalars through [`scalar!`](crate::scalar) or
/// [`custom_scan!`](crate::custom_scan).
pub trait Destination {
    const SHAPE: Shape;

    /// Repeated layers wrapping the innermost record or scalar. Scalars are 0,
    /// records are 1, containers add 1 to their element.
    const DIMENSION: usize;

    /// True when the type decodes scanned values itself.
    const CUSTOM_SCAN: bool = false;

    /// Element type produced by [`Destination::next_slot`]. Scalars and
    /// records name themselves.
    type Element: Destination;

    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    /// Rejects shape combinations that can never be filled. Called before any
    /// row is read.
    fn validate() -> Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }

    /// Creates the empty value a new row or a missing optional starts from.
    fn allocate() -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::unsupported(
            Self::type_name(),
            "cannot be created by the scanner",
        ))
    }

    /// Builds a value from one scanned cell. Fails with
    /// [`Error::TypeMismatch`] unless the type is a single-cell target.
    fn scan_new(value: Value) -> Result<Self>
    where
        Self: Sized,
    {
        let found = value.type_name();
        let mut element = Self::allocate()?;
        match element.as_cell() {
            Some(cell) => cell.scan_value(value)?,
            None => return Err(Error::type_mismatch(Self::type_name(), found)),
        }
        Ok(element)
    }

    /// Whether the value can be mutated through the handle it was reached by.
    fn settable(&self) -> bool {
        true
    }

    /// Creates the destination for the next row.
    fn next_slot(&mut self) -> Result<Slot<'_, Self::Element>> {
        Err(Error::InvalidDimension {
            operation: "next_slot",
            dimension: Self::DIMENSION,
        })
    }

    /// One scan target per column, in column order.
    fn scan_targets<'a>(&'a mut self, columns: &[Column]) -> Result<Vec<ScanTarget<'a>>>;

    /// Moves scratch values produced by [`Destination::scan_targets`] into the
    /// destination. A no-op for destinations scanned in place.
    fn materialize(&mut self, row: ScannedRow, columns: &[Column]) -> Result<()> {
        let _ = (row, columns);
        Ok(())
    }

    /// Contributes this value's leaves to a record's field table under `key`.
    fn resolve_fields<'a>(&'a mut self, key: &str, table: &mut FieldTable<'a>);

    /// The value as a single-cell target, when it is one.
    fn as_cell(&mut self) -> Option<&mut dyn ScanCell> {
        None
    }
}

impl<T: Destination> Destination for Box<T> {
    const SHAPE: Shape = T::SHAPE;
    const DIMENSION: usize = T::DIMENSION;
    const CUSTOM_SCAN: bool = T::CUSTOM_SCAN;
    type Element = T::Element;

    fn type_name() -> &'static str {
        T::type_name()
    }

    fn validate() -> Result<()> {
        T::validate()
    }

    fn allocate() -> Result<Self> {
        T::allocate().map(Box::new)
    }

    fn settable(&self) -> bool {
        (**self).settable()
    }

    fn next_slot(&mut self) -> Result<Slot<'_, Self::Element>> {
        (**self).next_slot()
    }

    fn scan_targets<'a>(&'a mut self, columns: &[Column]) -> Result<Vec<ScanTarget<'a>>> {
        (**self).scan_targets(columns)
    }

    fn materialize(&mut self, row: ScannedRow, columns: &[Column]) -> Result<()> {
        (**self).materialize(row, columns)
    }

    fn resolve_fields<'a>(&'a mut self, key: &str, table: &mut FieldTable<'a>) {
        (**self).resolve_fields(key, table)
    }

    fn as_cell(&mut self) -> Option<&mut dyn ScanCell> {
        (**self).as_cell()
    }
}

impl<T: Destination> Destination for Option<T> {
    const SHAPE: Shape = T::SHAPE;
    const DIMENSION: usize = T::DIMENSION;
    const CUSTOM_SCAN: bool = T::CUSTOM_SCAN;
    type Element = T::Element;

    fn validate() -> Result<()> {
        T::validate()
    }

    fn allocate() -> Result<Self> {
        Ok(None)
    }

    fn next_slot(&mut self) -> Result<Slot<'_, Self::Element>> {
        allocated(self)?.next_slot()
    }

    fn scan_targets<'a>(&'a mut self, columns: &[Column]) -> Result<Vec<ScanTarget<'a>>> {
        if T::SHAPE == Shape::Scalar {
            return Ok(vec![ScanTarget::Field(self)]);
        }
        allocated(self)?.scan_targets(columns)
    }

    fn materialize(&mut self, row: ScannedRow, columns: &[Column]) -> Result<()> {
        match self {
            Some(inner) if T::SHAPE != Shape::Scalar => inner.materialize(row, columns),
            _ => Ok(()),
        }
    }

    fn resolve_fields<'a>(&'a mut self, key: &str, table: &mut FieldTable<'a>) {
        if T::SHAPE == Shape::Scalar {
            table.insert(key, Leaf::Scalar(self));
            return;
        }
        match allocated(self) {
            Ok(inner) => inner.resolve_fields(key, table),
            Err(_) => table.insert(key, Leaf::Unsupported(T::type_name())),
        }
    }

    fn as_cell(&mut self) -> Option<&mut dyn ScanCell> {
        if T::SHAPE == Shape::Scalar {
            Some(self)
        } else {
            None
        }
    }
}

/// The inner value, created on first use.
fn allocated<T: Destination>(slot: &mut Option<T>) -> Result<&mut T> {
    if slot.is_none() {
        *slot = Some(T::allocate()?);
    }
    slot.as_mut()
        .ok_or_else(|| Error::Internal("optional destination vanished after allocation".into()))
}

macro_rules! impl_shared_destination {
    ($($ptr:ident),*) => {
        $(
            /// Mutable only while the handle is unique.
            impl<T: Destination> Destination for $ptr<T> {
                const SHAPE: Shape = T::SHAPE;
                const DIMENSION: usize = T::DIMENSION;
                const CUSTOM_SCAN: bool = T::CUSTOM_SCAN;
                type Element = T::Element;

                fn validate() -> Result<()> {
                    T::validate()
                }

                fn allocate() -> Result<Self> {
                    T::allocate().map($ptr::new)
                }

                fn settable(&self) -> bool {
                    $ptr::strong_count(self) == 1 && $ptr::weak_count(self) == 0
                }

                fn next_slot(&mut self) -> Result<Slot<'_, Self::Element>> {
                    $ptr::get_mut(self)
                        .ok_or(Error::NotSettable(Self::type_name()))?
                        .next_slot()
                }

                fn scan_targets<'a>(
                    &'a mut self,
                    columns: &[Column],
                ) -> Result<Vec<ScanTarget<'a>>> {
                    $ptr::get_mut(self)
                        .ok_or(Error::NotSettable(Self::type_name()))?
                        .scan_targets(columns)
                }

                fn materialize(&mut self, row: ScannedRow, columns: &[Column]) -> Result<()> {
                    $ptr::get_mut(self)
                        .ok_or(Error::NotSettable(Self::type_name()))?
                        .materialize(row, columns)
                }

                fn resolve_fields<'a>(&'a mut self, key: &str, table: &mut FieldTable<'a>) {
                    match $ptr::get_mut(self) {
                        Some(inner) => inner.resolve_fields(key, table),
                        None => table.insert(key, Leaf::Unsettable(Self::type_name())),
                    }
                }

                fn as_cell(&mut self) -> Option<&mut dyn ScanCell> {
                    $ptr::get_mut(self).and_then(|inner| inner.as_cell())
                }
            }
        )*
    };
}

impl_shared_destination!(Rc, Arc);

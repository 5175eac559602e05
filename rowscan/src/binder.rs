//! Binding a destination to rows.

use rowscan_result::{Error, Result};
use rowscan_types::Column;

use crate::buffer::{ScanTarget, ScannedRow};
use crate::destination::Destination;
use crate::shape::TypeShape;
use crate::slot::Slot;

/// A validated, mutable destination together with its classification.
///
/// Construction fails before any row is read when the handle is empty, the
/// destination cannot be mutated, or its shape cannot be filled. Types that
/// decode their own cells still write through `&mut self`, so a shared handle
/// to one is rejected like any other.
pub struct Binder<'a, D: Destination> {
    dest: &'a mut D,
    shape: TypeShape,
}

impl<'a, D: Destination> Binder<'a, D> {
    pub fn new(dest: Option<&'a mut D>) -> Result<Self> {
        let dest = dest.ok_or(Error::NilDestination)?;
        if !dest.settable() {
            return Err(Error::NotSettable(D::type_name()));
        }
        let shape = TypeShape::classify::<D>()?;
        tracing::trace!(
            destination = D::type_name(),
            shape = %shape.shape,
            dimension = shape.dimension,
            custom_scan = shape.custom_scan,
            "bound destination"
        );
        Ok(Self { dest, shape })
    }

    pub fn shape(&self) -> TypeShape {
        self.shape
    }

    pub fn dimension(&self) -> usize {
        self.shape.dimension
    }

    pub fn expects_single_row(&self) -> bool {
        self.shape.expects_single_row()
    }

    /// Creates the element that the next row is bound into. Only valid for
    /// repeated destinations.
    pub fn next_slot(&mut self) -> Result<Slot<'_, D::Element>> {
        if self.shape.expects_single_row() {
            return Err(Error::InvalidDimension {
                operation: "next_slot",
                dimension: self.shape.dimension,
            });
        }
        self.dest.next_slot()
    }

    /// Scan targets for the current row, one per column.
    pub fn build_scan_targets(&mut self, columns: &[Column]) -> Result<Vec<ScanTarget<'_>>> {
        if columns.is_empty() {
            return Err(Error::EmptyColumns);
        }
        if !self.shape.expects_single_row() {
            return Err(Error::InvalidDimension {
                operation: "build_scan_targets",
                dimension: self.shape.dimension,
            });
        }
        self.dest.scan_targets(columns)
    }

    /// Moves the scratch values of a scanned row into the destination.
    pub fn materialize(&mut self, row: ScannedRow, columns: &[Column]) -> Result<()> {
        if row.is_empty() {
            return Err(Error::EmptyParams);
        }
        self.dest.materialize(row, columns)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::rc::Rc;

    use arrow::datatypes::DataType;
    use rowscan_types::{FromValue, Value};

    use super::*;

    crate::record! {
        #[derive(Debug, Default)]
        struct Point {
            x: i32,
            y: i32,
        }
    }

    #[test]
    fn empty_handle_is_rejected() {
        let err = Binder::<Point>::new(None).err().unwrap();
        assert!(matches!(err, Error::NilDestination));
    }

    #[test]
    fn shared_handles_are_rejected() {
        let mut shared = Rc::new(Point::default());
        let _alias = Rc::clone(&shared);
        let err = Binder::new(Some(&mut shared)).err().unwrap();
        assert!(matches!(err, Error::NotSettable(_)));
    }

    #[derive(Debug, Default)]
    struct Upper(String);

    impl crate::ScanCell for Upper {
        fn scan_value(&mut self, value: Value) -> Result<()> {
            self.0 = String::from_value(value)?.to_uppercase();
            Ok(())
        }
    }

    crate::custom_scan!(Upper);

    #[test]
    fn shared_custom_scan_handles_are_rejected() {
        let mut shared = Rc::new(Upper::default());
        let _alias = Rc::clone(&shared);
        let err = Binder::new(Some(&mut shared)).err().unwrap();
        assert!(matches!(err, Error::NotSettable(_)));
    }

    #[test]
    fn next_slot_requires_repeated_destination() {
        let mut point = Point::default();
        let mut binder = Binder::new(Some(&mut point)).unwrap();
        assert!(matches!(
            binder.next_slot(),
            Err(Error::InvalidDimension { dimension: 1, .. })
        ));
    }

    #[test]
    fn scan_targets_require_columns() {
        let mut point = Point::default();
        let mut binder = Binder::new(Some(&mut point)).unwrap();
        assert!(matches!(
            binder.build_scan_targets(&[]),
            Err(Error::EmptyColumns)
        ));
    }

    #[test]
    fn repeated_destinations_have_no_row_targets() {
        let mut points: Vec<Point> = Vec::new();
        let mut binder = Binder::new(Some(&mut points)).unwrap();
        let columns = [Column::new("x", DataType::Int32)];
        assert!(matches!(
            binder.build_scan_targets(&columns),
            Err(Error::InvalidDimension { dimension: 2, .. })
        ));
    }

    #[test]
    fn materialize_requires_cells() {
        let mut map: HashMap<String, Value> = HashMap::new();
        let mut binder = Binder::new(Some(&mut map)).unwrap();
        assert!(matches!(
            binder.materialize(ScannedRow::default(), &[]),
            Err(Error::EmptyParams)
        ));
    }

    #[test]
    fn slots_append_to_sequences() {
        let mut points: Vec<Point> = Vec::new();
        let mut binder = Binder::new(Some(&mut points)).unwrap();
        binder.next_slot().unwrap().target().x = 5;
        drop(binder);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].x, 5);
    }
}

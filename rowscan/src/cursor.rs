//! Row sources.
//!
//! A [`RowCursor`] is the forward-only view of a query result that the
//! scanner drives: advance to the next row, report the column metadata,
//! and write the current row into a [`RowBuffer`]. Iteration faults are
//! reported through [`RowCursor::error`] once `advance` returns false.

use arrow::datatypes::DataType;
use rowscan_result::{Error, Result};
use rowscan_types::{Column, Value};

use crate::adapter::{ListAdapter, NativeList};
use crate::buffer::RowBuffer;

pub trait RowCursor {
    /// Moves to the next row. Returns false when the rows are exhausted or
    /// iteration failed.
    fn advance(&mut self) -> bool;

    fn columns(&self) -> Result<Vec<Column>>;

    /// Writes the current row into `row`. Fails with
    /// [`Error::ColumnCountMismatch`] when `row` does not hold one target per
    /// column.
    fn scan_into(&mut self, row: &mut RowBuffer<'_, '_>) -> Result<()>;

    /// Takes the fault that stopped iteration, if any.
    fn error(&mut self) -> Option<Error> {
        None
    }

    /// Decoder for list-valued columns bound to sequence fields.
    fn list_adapter(&self) -> &'static dyn ListAdapter {
        &NativeList
    }
}

impl<C: RowCursor + ?Sized> RowCursor for &mut C {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn columns(&self) -> Result<Vec<Column>> {
        (**self).columns()
    }

    fn scan_into(&mut self, row: &mut RowBuffer<'_, '_>) -> Result<()> {
        (**self).scan_into(row)
    }

    fn error(&mut self) -> Option<Error> {
        (**self).error()
    }

    fn list_adapter(&self) -> &'static dyn ListAdapter {
        (**self).list_adapter()
    }
}

impl<C: RowCursor + ?Sized> RowCursor for Box<C> {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn columns(&self) -> Result<Vec<Column>> {
        (**self).columns()
    }

    fn scan_into(&mut self, row: &mut RowBuffer<'_, '_>) -> Result<()> {
        (**self).scan_into(row)
    }

    fn error(&mut self) -> Option<Error> {
        (**self).error()
    }

    fn list_adapter(&self) -> &'static dyn ListAdapter {
        (**self).list_adapter()
    }
}

/// Checks a row buffer against the column count.
pub fn check_row_width(row: &RowBuffer<'_, '_>, columns: usize) -> Result<()> {
    if row.len() != columns {
        return Err(Error::ColumnCountMismatch {
            expected: columns,
            got: row.len(),
        });
    }
    Ok(())
}

/// Rows held in memory.
///
/// Useful for tests and for results that were already materialized as
/// [`Value`]s. A fault can be injected to stop iteration after a number of
/// rows, the way a dropped connection would.
#[derive(Debug)]
pub struct MemCursor {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
    position: Option<usize>,
    fail_after: Option<(usize, Error)>,
    error: Option<Error>,
    adapter: &'static dyn ListAdapter,
}

impl MemCursor {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows,
            position: None,
            fail_after: None,
            error: None,
            adapter: &NativeList,
        }
    }

    /// One column, one row.
    pub fn single(name: &str, value: Value) -> Self {
        let scan_type = scan_type_of(&value);
        Self::new(vec![Column::new(name, scan_type)], vec![vec![value]])
    }

    /// Columns typed from the first row, or `Null` when there are no rows.
    pub fn from_rows(names: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let columns = names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let scan_type = rows
                    .first()
                    .and_then(|row| row.get(idx))
                    .map_or(DataType::Null, scan_type_of);
                Column::new(*name, scan_type)
            })
            .collect();
        Self::new(columns, rows)
    }

    /// Stops iteration after `rows` rows and reports `err`.
    pub fn fail_after(mut self, rows: usize, err: Error) -> Self {
        self.fail_after = Some((rows, err));
        self
    }

    pub fn with_list_adapter(mut self, adapter: &'static dyn ListAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    fn current(&self) -> Result<&[Value]> {
        self.position
            .and_then(|pos| self.rows.get(pos))
            .map(Vec::as_slice)
            .ok_or_else(|| Error::Cursor("scan called without a current row".into()))
    }
}

impl RowCursor for MemCursor {
    fn advance(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        let next = self.position.map_or(0, |pos| pos + 1);
        if let Some((limit, _)) = &self.fail_after
            && next >= *limit
        {
            self.error = self.fail_after.take().map(|(_, err)| err);
            return false;
        }
        if next >= self.rows.len() {
            self.position = Some(self.rows.len());
            return false;
        }
        self.position = Some(next);
        true
    }

    fn columns(&self) -> Result<Vec<Column>> {
        Ok(self.columns.clone())
    }

    fn scan_into(&mut self, row: &mut RowBuffer<'_, '_>) -> Result<()> {
        check_row_width(row, self.columns.len())?;
        let values = self.current()?.to_vec();
        if values.len() != self.columns.len() {
            return Err(Error::Cursor(format!(
                "row has {} values for {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        for (ordinal, value) in values.into_iter().enumerate() {
            row.set(ordinal, value)?;
        }
        Ok(())
    }

    fn error(&mut self) -> Option<Error> {
        self.error.take()
    }

    fn list_adapter(&self) -> &'static dyn ListAdapter {
        self.adapter
    }
}

/// Scan type reported for a value when no schema is given.
pub fn scan_type_of(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Boolean(_) => DataType::Boolean,
        Value::Int(_) => DataType::Int64,
        Value::UInt(_) => DataType::UInt64,
        Value::Float(_) => DataType::Float64,
        Value::Text(_) => DataType::Utf8,
        Value::Bytes(_) => DataType::Binary,
        Value::Date32(_) => DataType::Date32,
        Value::Timestamp(_) => {
            DataType::Timestamp(arrow::datatypes::TimeUnit::Microsecond, None)
        }
        Value::List(items) => {
            let element = items.first().map_or(DataType::Null, scan_type_of);
            DataType::List(std::sync::Arc::new(arrow::datatypes::Field::new(
                "item", element, true,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ScanTarget;

    #[test]
    fn fault_stops_iteration() {
        let mut cursor = MemCursor::from_rows(
            &["n"],
            vec![vec![Value::Int(1)], vec![Value::Int(2)]],
        )
        .fail_after(1, Error::Cursor("connection reset".into()));
        assert!(cursor.advance());
        assert!(!cursor.advance());
        assert!(matches!(cursor.error(), Some(Error::Cursor(_))));
        assert!(cursor.error().is_none());
    }

    #[test]
    fn exhausted_cursor_stays_exhausted() {
        let mut cursor = MemCursor::single("n", Value::Int(1));
        assert!(cursor.advance());
        assert!(!cursor.advance());
        assert!(!cursor.advance());
        assert!(cursor.error().is_none());
    }

    #[test]
    fn scan_requires_one_target_per_column() {
        let mut cursor =
            MemCursor::from_rows(&["a", "b"], vec![vec![Value::Int(1), Value::Int(2)]]);
        assert!(cursor.advance());
        let mut only = 0i64;
        let mut row = RowBuffer::new(vec![ScanTarget::Field(&mut only)], &NativeList);
        assert!(matches!(
            cursor.scan_into(&mut row),
            Err(Error::ColumnCountMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn columns_are_typed_from_the_first_row() {
        let cursor = MemCursor::from_rows(
            &["id", "name"],
            vec![vec![Value::Int(1), Value::from("x")]],
        );
        let columns = cursor.columns().unwrap();
        assert_eq!(columns[0].scan_type, DataType::Int64);
        assert_eq!(columns[1].scan_type, DataType::Utf8);
    }
}

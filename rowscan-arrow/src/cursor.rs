use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchReader};
use rowscan::cursor::check_row_width;
use rowscan::{ListAdapter, NativeList, RowBuffer, RowCursor};
use rowscan_result::{Error, Result};
use rowscan_types::Column;

use crate::value::value_at;

type BatchIter = Box<dyn Iterator<Item = std::result::Result<RecordBatch, ArrowError>> + Send>;

/// Row cursor over a stream of Arrow record batches sharing one schema.
///
/// Empty batches are skipped. An error yielded by the stream stops iteration
/// and is reported by [`RowCursor::error`].
pub struct RecordBatchCursor {
    schema: SchemaRef,
    columns: Vec<Column>,
    batches: BatchIter,
    current: Option<RecordBatch>,
    row: usize,
    error: Option<Error>,
    adapter: &'static dyn ListAdapter,
}

impl RecordBatchCursor {
    pub fn new<I>(schema: SchemaRef, batches: I) -> Self
    where
        I: IntoIterator<Item = std::result::Result<RecordBatch, ArrowError>>,
        I::IntoIter: Send + 'static,
    {
        let columns = schema.fields().iter().map(|f| Column::from(f.as_ref())).collect();
        Self {
            schema,
            columns,
            batches: Box::new(batches.into_iter()),
            current: None,
            row: 0,
            error: None,
            adapter: &NativeList,
        }
    }

    pub fn from_batch(batch: RecordBatch) -> Self {
        Self::new(batch.schema(), std::iter::once(Ok(batch)))
    }

    /// Batches already in memory. All batches must share `schema`.
    pub fn from_batches(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self::new(schema, batches.into_iter().map(Ok))
    }

    pub fn from_reader<R>(reader: R) -> Self
    where
        R: RecordBatchReader + Send + 'static,
    {
        Self::new(reader.schema(), reader)
    }

    pub fn with_list_adapter(mut self, adapter: &'static dyn ListAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn load_next_batch(&mut self) -> bool {
        for next in self.batches.by_ref() {
            match next {
                Ok(batch) if batch.num_rows() == 0 => continue,
                Ok(batch) => {
                    if batch.num_columns() != self.columns.len() {
                        self.error = Some(Error::Cursor(format!(
                            "record batch has {} columns, schema has {}",
                            batch.num_columns(),
                            self.columns.len()
                        )));
                        self.current = None;
                        return false;
                    }
                    tracing::trace!(rows = batch.num_rows(), "loaded record batch");
                    self.current = Some(batch);
                    self.row = 0;
                    return true;
                }
                Err(err) => {
                    tracing::debug!(error = %err, "record batch stream failed");
                    self.error = Some(err.into());
                    self.current = None;
                    return false;
                }
            }
        }
        self.current = None;
        false
    }
}

impl RowCursor for RecordBatchCursor {
    fn advance(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        if let Some(batch) = &self.current
            && self.row + 1 < batch.num_rows()
        {
            self.row += 1;
            return true;
        }
        self.load_next_batch()
    }

    fn columns(&self) -> Result<Vec<Column>> {
        Ok(self.columns.clone())
    }

    fn scan_into(&mut self, row: &mut RowBuffer<'_, '_>) -> Result<()> {
        check_row_width(row, self.columns.len())?;
        let batch = self
            .current
            .as_ref()
            .ok_or_else(|| Error::Cursor("scan called without a current row".into()))?;
        for (ordinal, array) in batch.columns().iter().enumerate() {
            row.set(ordinal, value_at(array.as_ref(), self.row)?)?;
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

impl std::fmt::Debug for RecordBatchCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordBatchCursor")
            .field("columns", &self.columns)
            .field("row", &self.row)
            .field("adapter", &self.adapter.name())
            .finish_non_exhaustive()
    }
}

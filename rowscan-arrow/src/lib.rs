//! Arrow record batches as a row source for `rowscan`.
//!
//! [`RecordBatchCursor`] walks a stream of [`RecordBatch`]es row by row,
//! reporting each cell as a [`Value`](rowscan_types::Value). Timestamps of
//! every unit are normalized to microseconds, `Date64` to days, and list
//! arrays to nested list values.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use arrow::array::{Int64Array, StringArray};
//! use arrow::datatypes::{DataType, Field, Schema};
//! use arrow::record_batch::RecordBatch;
//! use rowscan::record;
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     struct Tag {
//!         id: i64,
//!         label: String,
//!     }
//! }
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("id", DataType::Int64, false),
//!     Field::new("label", DataType::Utf8, false),
//! ]));
//! let batch = RecordBatch::try_new(
//!     schema,
//!     vec![
//!         Arc::new(Int64Array::from(vec![1, 2])),
//!         Arc::new(StringArray::from(vec!["red", "blue"])),
//!     ],
//! )
//! .unwrap();
//!
//! let mut tags: Vec<Tag> = Vec::new();
//! rowscan_arrow::scan_batch(batch, &mut tags).unwrap();
//! assert_eq!(tags[1].label, "blue");
//! ```

use arrow::record_batch::RecordBatch;
use rowscan::Destination;
use rowscan_result::Result;

pub mod cursor;
pub mod value;

pub use cursor::RecordBatchCursor;
pub use value::value_at;

/// Scans the rows of one batch into `dest`.
pub fn scan_batch<D: Destination>(batch: RecordBatch, dest: &mut D) -> Result<()> {
    rowscan::scan(RecordBatchCursor::from_batch(batch), dest)
}

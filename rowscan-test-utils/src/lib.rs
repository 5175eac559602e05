//! Shared helpers for rowscan tests: tracing setup and the `users` fixture,
//! available both as in-memory rows and as an Arrow record batch.

use std::sync::{Arc, Once};

use arrow::array::{ArrayRef, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rowscan::MemCursor;
use rowscan_types::{Column, Value};

pub mod matrix;

pub use matrix::{Query, User, check_users_matrix};

static INIT: Once = Once::new();

/// Initialize tracing for test binaries. Safe to call multiple times.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

#[cfg(feature = "auto-init")]
mod auto {
    use ctor::ctor;

    #[ctor]
    fn init() {
        super::init_tracing_for_tests();
    }
}

/// Rows of the `users` table: `(id, name, password)`.
pub const USERS: [(i32, &str, &str); 2] = [
    (1, "avalchev94", "github"),
    (2, "avalchev", "linkedin"),
];

fn users_type(column: &str) -> DataType {
    match column {
        "id" => DataType::Int32,
        _ => DataType::Utf8,
    }
}

fn users_value(row: (i32, &str, &str), column: &str) -> Value {
    match column {
        "id" => Value::Int(i64::from(row.0)),
        "name" => Value::from(row.1),
        "password" => Value::from(row.2),
        other => panic!("users has no column {other}"),
    }
}

/// `SELECT <columns> FROM users`, in memory.
pub fn users_cursor(columns: &[&str]) -> MemCursor {
    let schema = columns
        .iter()
        .map(|name| Column::new(*name, users_type(name)))
        .collect();
    let rows = USERS
        .iter()
        .map(|row| columns.iter().map(|name| users_value(*row, name)).collect())
        .collect();
    MemCursor::new(schema, rows)
}

/// `SELECT <columns> FROM users`, as a record batch.
pub fn users_batch(columns: &[&str]) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|name| Field::new(*name, users_type(name), false))
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|name| -> ArrayRef {
            match *name {
                "id" => Arc::new(Int32Array::from_iter_values(USERS.iter().map(|u| u.0))),
                "name" => Arc::new(StringArray::from_iter_values(USERS.iter().map(|u| u.1))),
                "password" => Arc::new(StringArray::from_iter_values(USERS.iter().map(|u| u.2))),
                other => panic!("users has no column {other}"),
            }
        })
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .expect("users batch matches its schema")
}

/// `SELECT COUNT(*) FROM users`, in memory.
pub fn users_count_cursor() -> MemCursor {
    MemCursor::new(
        vec![Column::new("count", DataType::Int64)],
        vec![vec![Value::Int(USERS.len() as i64)]],
    )
}

/// `SELECT COUNT(*) FROM users`, as a record batch.
pub fn users_count_batch() -> RecordBatch {
    let schema = Schema::new(vec![Field::new("count", DataType::Int64, false)]);
    let count: ArrayRef = Arc::new(Int64Array::from(vec![USERS.len() as i64]));
    RecordBatch::try_new(Arc::new(schema), vec![count]).expect("count batch matches its schema")
}

/// Runs `query` against the in-memory fixture.
pub fn users_query_cursor(query: Query) -> MemCursor {
    match query {
        Query::Select(columns) => users_cursor(columns),
        Query::Count => users_count_cursor(),
    }
}

/// Runs `query` against the record batch fixture.
pub fn users_query_batch(query: Query) -> RecordBatch {
    match query {
        Query::Select(columns) => users_batch(columns),
        Query::Count => users_count_batch(),
    }
}

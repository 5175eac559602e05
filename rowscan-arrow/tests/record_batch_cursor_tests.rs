use std::sync::Arc;

use arrow::array::{
    ArrayRef, Int32Array, Int64Array, ListArray, StringArray, TimestampSecondArray,
};
use arrow::datatypes::{DataType, Field, Int32Type, Schema, TimeUnit};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use rowscan::{Error, RowCursor, Value, record};
use rowscan_arrow::RecordBatchCursor;
use rowscan_test_utils::{User, check_users_matrix, users_batch, users_query_batch};
use time::macros::datetime;

#[test]
fn users_matrix_over_record_batches() {
    check_users_matrix(|query| RecordBatchCursor::from_batch(users_query_batch(query)));
}

fn ids_batch(ids: Vec<i64>) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
    let ids: ArrayRef = Arc::new(Int64Array::from(ids));
    RecordBatch::try_new(schema, vec![ids]).expect("ids batch")
}

#[test]
fn rows_span_batches_and_skip_empty_ones() {
    let schema = ids_batch(Vec::new()).schema();
    let batches = vec![ids_batch(vec![1, 2]), ids_batch(Vec::new()), ids_batch(vec![3])];
    let cursor = RecordBatchCursor::from_batches(schema, batches);
    let mut ids: Vec<Vec<i64>> = Vec::new();
    rowscan::scan(cursor, &mut ids).expect("scan ids");
    assert_eq!(ids, vec![vec![1], vec![2], vec![3]]);
}

#[test]
fn stream_errors_surface_after_earlier_rows() {
    let schema = ids_batch(Vec::new()).schema();
    let stream = vec![
        Ok(ids_batch(vec![1])),
        Err(ArrowError::IoError(
            "stream interrupted".into(),
            std::io::Error::other("stream interrupted"),
        )),
        Ok(ids_batch(vec![2])),
    ];
    let cursor = RecordBatchCursor::new(schema, stream);
    let mut rows: Vec<Vec<i64>> = Vec::new();
    let err = rowscan::scan(cursor, &mut rows).unwrap_err();
    assert!(matches!(err, Error::Arrow(_)));
    assert_eq!(rows, vec![vec![1]]);
}

#[test]
fn columns_come_from_the_schema() {
    let cursor = RecordBatchCursor::from_batch(users_batch(&["id", "name"]));
    let columns = cursor.columns().expect("columns");
    assert_eq!(columns[0].name, "id");
    assert_eq!(columns[0].scan_type, DataType::Int32);
    assert_eq!(columns[1].scan_type, DataType::Utf8);
}

#[test]
fn empty_results_report_no_rows_for_records() {
    let empty = users_batch(&["id", "name", "password"]).slice(0, 0);
    let mut user = User::default();
    let err = rowscan_arrow::scan_batch(empty, &mut user).unwrap_err();
    assert!(matches!(err, Error::NoRows));
}

record! {
    #[derive(Debug, Default)]
    struct Post {
        id: i32,
        title: Option<String>,
        published: Option<time::PrimitiveDateTime>,
        tags: Vec<i32>,
    }
}

#[test]
fn nulls_lists_and_timestamps_bind_to_fields() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("title", DataType::Utf8, true),
        Field::new(
            "published",
            DataType::Timestamp(TimeUnit::Second, None),
            true,
        ),
        Field::new(
            "tags",
            DataType::List(Arc::new(Field::new("item", DataType::Int32, true))),
            true,
        ),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(vec![1, 2])),
        Arc::new(StringArray::from(vec![Some("hello"), None])),
        Arc::new(TimestampSecondArray::from(vec![Some(1_709_214_301), None])),
        Arc::new(ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
            Some(vec![Some(7), Some(8)]),
            None,
        ])),
    ];
    let batch = RecordBatch::try_new(schema, columns).expect("posts batch");

    let mut posts: Vec<Post> = Vec::new();
    rowscan_arrow::scan_batch(batch, &mut posts).expect("scan posts");

    assert_eq!(posts[0].title.as_deref(), Some("hello"));
    assert_eq!(posts[0].published, Some(datetime!(2024-02-29 13:45:01)));
    assert_eq!(posts[0].tags, vec![7, 8]);
    assert_eq!(posts[1].title, None);
    assert_eq!(posts[1].published, None);
    assert!(posts[1].tags.is_empty());
}

#[test]
fn cells_read_as_dynamic_values() {
    let mut row: Vec<Value> = Vec::new();
    rowscan_arrow::scan_batch(users_batch(&["id", "name"]), &mut row).expect("scan row");
    assert_eq!(row, vec![Value::Int(1), Value::from("avalchev94")]);
}

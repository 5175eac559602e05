//! Rowscan: bind tabular query results to Rust destinations.
//!
//! A single entry point, [`Scanner::scan`], fills whatever the caller hands
//! it from a [`RowCursor`]: a scalar, a record, a map, a sequence, or a
//! channel sender. What happens is decided by the destination's shape and
//! dimension.
//!
//! # Quick Start
//!
//! ```rust
//! use rowscan::{record, MemCursor, Value};
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct User {
//!         pub id: i64,
//!         pub username: String,
//!     }
//! }
//!
//! let cursor = MemCursor::from_rows(
//!     &["id", "username"],
//!     vec![
//!         vec![Value::Int(1), Value::from("avalchev94")],
//!         vec![Value::Int(2), Value::from("avalchev")],
//!     ],
//! );
//! let mut users: Vec<User> = Vec::new();
//! rowscan::scan(cursor, &mut users).unwrap();
//! assert_eq!(users[1].username, "avalchev");
//! ```
//!
//! # Architecture
//!
//! - **Classification** ([`shape`]): [`TypeShape`] reports the shape and
//!   dimension of a [`Destination`] type and rejects unusable combinations.
//! - **Destinations** ([`destination`], [`container`], [`channel`],
//!   [`record!`]): how each shape produces slots, scan targets and
//!   materialized values.
//! - **Field resolution** ([`fields`]): records flatten into a
//!   [`FieldTable`] consumed by column name, first-in first-out.
//! - **Binding** ([`binder`], [`buffer`]): a [`Binder`] validates a destination
//!   and hands out per-row [`ScanTarget`]s.
//! - **Orchestration** ([`scanner`], [`cursor`]): the [`Scanner`] drives a
//!   [`RowCursor`] and applies the single-row and repeated-row contracts.
//! - **List adapters** ([`adapter`]): decode array columns for sequence
//!   fields.
//!
//! Arrow record batches are scanned through the `rowscan-arrow` crate.

pub mod adapter;
pub mod binder;
pub mod buffer;
pub mod cell;
pub mod channel;
pub mod container;
pub mod cursor;
pub mod destination;
pub mod fields;
mod record;
pub mod scanner;
pub mod shape;
pub mod slot;

pub use adapter::{ListAdapter, NativeList, PgArrayText};
pub use binder::Binder;
pub use buffer::{RowBuffer, ScanTarget, ScannedRow};
pub use cell::{ListTarget, ScanCell};
pub use channel::Sink;
pub use container::{ColumnId, MapKey};
pub use cursor::{MemCursor, RowCursor};
pub use destination::Destination;
pub use fields::{FieldTable, Leaf, record_targets};
pub use scanner::{ScanOptions, Scanner, scan};
pub use shape::{Shape, TypeShape};
pub use slot::Slot;

pub use rowscan_result::{Error, Result};
pub use rowscan_types::{Column, FromValue, Value};

//! Cell values and column metadata shared by rowscan crates.
//!
//! Cursors report each cell of a row as a [`Value`] and describe the row with
//! [`Column`]s whose scan types are Arrow [`DataType`](arrow::datatypes::DataType)s.
//! [`FromValue`] carries the assign-or-convert rules used when a value lands
//! in a native destination type.

pub mod column;
pub mod convert;
pub mod date;
pub mod value;

pub use column::Column;
pub use convert::FromValue;
pub use value::Value;

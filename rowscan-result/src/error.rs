use std::fmt;

use thiserror::Error;

/// Unified error type for all rowscan operations.
///
/// Every failure aborts the current scan. There is no partial-result contract:
/// container elements appended before the failure stay in the destination, so a
/// caller that receives an error should discard the destination.
///
/// # Error Categories
///
/// - **Destination errors** raised while classifying the destination, before any
///   row is read: [`Error::NilDestination`], [`Error::NotSettable`],
///   [`Error::UnsupportedShape`], [`Error::InvalidKeyType`].
/// - **Binding errors** raised while a row is bound: [`Error::InvalidDimension`],
///   [`Error::EmptyColumns`], [`Error::EmptyParams`], [`Error::TypeMismatch`],
///   [`Error::ValueOutOfRange`], [`Error::ChannelClosed`].
/// - **Result errors**: [`Error::NoRows`].
/// - **Cursor errors** passed through from the row source: [`Error::Arrow`],
///   [`Error::Cursor`], [`Error::ColumnCountMismatch`].
#[derive(Error, Debug)]
pub enum Error {
    /// The destination handle was empty.
    #[error("destination is nil")]
    NilDestination,

    /// The destination cannot be mutated through the handle that was passed.
    ///
    /// Raised for shared-ownership destinations (`Rc<T>`, `Arc<T>`) that have other
    /// strong or weak references outstanding.
    #[error("destination {0} is not settable")]
    NotSettable(&'static str),

    /// The destination type is not one of the supported shapes, or combines them
    /// in a way the binder cannot fill (e.g. a map of records).
    #[error("unsupported destination {type_name}: {reason}")]
    UnsupportedShape {
        type_name: &'static str,
        reason: &'static str,
    },

    /// An operation was called on a binder whose dimension does not allow it.
    #[error("{operation} is not valid for a destination of dimension {dimension}")]
    InvalidDimension {
        operation: &'static str,
        dimension: usize,
    },

    /// The cursor reported no columns for the current row.
    #[error("row has no columns")]
    EmptyColumns,

    /// Materialization was requested with no scanned cells.
    #[error("no scanned cells to materialize")]
    EmptyParams,

    /// A map destination declares a key type that can hold neither a column
    /// name nor a column ordinal.
    #[error("{0} is not a suitable map key type")]
    InvalidKeyType(&'static str),

    /// A scanned value is neither assignable nor convertible to the target type.
    #[error("cannot assign {found} to {expected}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A scanned value is convertible in kind but does not fit the target type.
    #[error("value {value} out of range for {target}")]
    ValueOutOfRange { target: &'static str, value: String },

    /// A single-row destination was scanned against an empty result.
    #[error("no rows in result set")]
    NoRows,

    /// The consumer side of a channel destination was dropped.
    #[error("channel destination is closed")]
    ChannelClosed,

    /// The cursor was handed a row buffer whose length differs from its column count.
    #[error("expected {expected} scan targets, got {got}")]
    ColumnCountMismatch { expected: usize, got: usize },

    /// Arrow error raised while reading record batches.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Iteration-level fault reported by a row cursor.
    #[error("cursor error: {0}")]
    Cursor(String),

    /// Internal error indicating a bug or unexpected state.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a cursor error from any displayable error.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowscan_result::Error;
    ///
    /// let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection reset");
    /// let err = Error::cursor(io_err);
    /// assert!(matches!(err, Error::Cursor(msg) if msg.contains("connection reset")));
    /// ```
    #[inline]
    pub fn cursor<E: fmt::Display>(err: E) -> Self {
        Error::Cursor(err.to_string())
    }

    #[inline]
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch { expected, found }
    }

    #[inline]
    pub fn out_of_range<V: fmt::Display>(target: &'static str, value: V) -> Self {
        Error::ValueOutOfRange {
            target,
            value: value.to_string(),
        }
    }

    #[inline]
    pub fn unsupported(type_name: &'static str, reason: &'static str) -> Self {
        Error::UnsupportedShape { type_name, reason }
    }
}

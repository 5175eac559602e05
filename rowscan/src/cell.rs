//! Scan targets for single cells.
//!
//! A [`ScanCell`] receives exactly one [`Value`] per row. Built-in scalars
//! implement it by way of [`FromValue`](rowscan_types::FromValue); user types
//! with their own decoding implement it by hand and register with
//! [`custom_scan!`](crate::custom_scan).

use rowscan_result::Result;
use rowscan_types::Value;

use crate::destination::Destination;

/// A destination that accepts one scanned value.
pub trait ScanCell {
    fn scan_value(&mut self, value: Value) -> Result<()>;

    /// Name used in error messages.
    fn cell_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A record field holding a sequence, filled from one list-valued column.
pub trait ListTarget {
    /// Replaces the contents with `items`; `None` is a NULL column.
    fn assign_list(&mut self, items: Option<Vec<Value>>) -> Result<()>;

    fn list_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// NULL clears the option; anything else replaces it with a value built
/// from the cell.
impl<T: Destination> ScanCell for Option<T> {
    fn scan_value(&mut self, value: Value) -> Result<()> {
        *self = if value.is_null() {
            None
        } else {
            Some(T::scan_new(value)?)
        };
        Ok(())
    }
}

/// Implements [`Destination`] and [`ScanCell`] for types that already
/// implement [`FromValue`](rowscan_types::FromValue) and `Default`.
///
/// ```
/// use rowscan::{scalar, FromValue, Result, Value};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Cents(i64);
///
/// impl FromValue for Cents {
///     const TYPE_NAME: &'static str = "Cents";
///
///     fn from_value(value: Value) -> Result<Self> {
///         i64::from_value(value).map(Cents)
///     }
/// }
///
/// scalar!(Cents);
///
/// let mut total = Cents::default();
/// let cursor = rowscan::MemCursor::single("total", Value::Int(250));
/// rowscan::scan(cursor, &mut total).unwrap();
/// assert_eq!(total, Cents(250));
/// ```
#[macro_export]
macro_rules! scalar {
    (@with_empty $ty:ty, $empty:expr) => {
        impl $crate::ScanCell for $ty {
            fn scan_value(&mut self, value: $crate::Value) -> $crate::Result<()> {
                *self = <$ty as $crate::FromValue>::from_value(value)?;
                Ok(())
            }

            fn cell_type_name(&self) -> &'static str {
                <$ty as $crate::FromValue>::TYPE_NAME
            }
        }

        $crate::__leaf_destination!($ty, false, $empty);
    };
    ($($ty:ty),* $(,)?) => {
        $(
            $crate::scalar!(@with_empty $ty, <$ty as ::std::default::Default>::default());
        )*
    };
}

/// Registers a type that implements [`ScanCell`] itself.
///
/// Such types are terminal leaves: a record field of this type is never
/// flattened. The type must implement `Default`, which provides the value a
/// new row starts from.
///
/// ```
/// use rowscan::{custom_scan, Result, ScanCell, Value};
///
/// #[derive(Debug, Default)]
/// struct Tags(Vec<String>);
///
/// impl ScanCell for Tags {
///     fn scan_value(&mut self, value: Value) -> Result<()> {
///         if let Value::Text(text) = value {
///             self.0 = text.split(',').map(str::to_owned).collect();
///         }
///         Ok(())
///     }
/// }
///
/// custom_scan!(Tags);
/// ```
#[macro_export]
macro_rules! custom_scan {
    ($($ty:ty),* $(,)?) => {
        $(
            $crate::__leaf_destination!($ty, true, <$ty as ::std::default::Default>::default());
        )*
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __leaf_destination {
    ($ty:ty, $custom:expr, $empty:expr) => {
        impl $crate::Destination for $ty {
            const SHAPE: $crate::Shape = $crate::Shape::Scalar;
            const DIMENSION: usize = 0;
            const CUSTOM_SCAN: bool = $custom;
            type Element = Self;

            fn type_name() -> &'static str {
                ::std::any::type_name::<$ty>()
            }

            fn allocate() -> $crate::Result<Self> {
                Ok($empty)
            }

            fn scan_targets<'a>(
                &'a mut self,
                _columns: &[$crate::Column],
            ) -> $crate::Result<::std::vec::Vec<$crate::ScanTarget<'a>>> {
                Ok(::std::vec![$crate::ScanTarget::Field(self)])
            }

            fn resolve_fields<'a>(&'a mut self, key: &str, table: &mut $crate::FieldTable<'a>) {
                table.insert(key, $crate::Leaf::Scalar(self));
            }

            fn as_cell(&mut self) -> ::std::option::Option<&mut dyn $crate::ScanCell> {
                Some(self)
            }
        }
    };
}

scalar!(
    bool,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    Value,
);

scalar!(@with_empty time::Date, time::macros::date!(1970 - 01 - 01));
scalar!(@with_empty time::PrimitiveDateTime, time::macros::datetime!(1970-01-01 0:00));
scalar!(
    @with_empty time::OffsetDateTime,
    time::OffsetDateTime::UNIX_EPOCH
);

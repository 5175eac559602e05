//! Record registration.

/// Declares a struct and registers it as a record destination.
///
/// Each field is matched against columns by name, case-insensitively. A
/// field can be renamed with `=> "column"` or excluded with `=> skip`.
/// Fields that are themselves records are flattened into the parent, so
/// their leaves match columns directly; leaves with the same column key are
/// filled in declaration order when the result repeats that column.
///
/// A new record is built from the empty value of every registered field, so
/// the struct itself needs no `Default` impl. Skipped fields are initialized
/// with `Default::default()`.
///
/// ```
/// use rowscan::{record, MemCursor, Value};
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Account {
///         pub id: i64,
///         pub login: String => "username",
///         pub cached: Option<String> => skip,
///     }
/// }
///
/// let cursor = MemCursor::from_rows(
///     &["id", "USERNAME"],
///     vec![vec![Value::Int(7), Value::from("ada")]],
/// );
/// let mut account = Account::default();
/// rowscan::scan(cursor, &mut account).unwrap();
/// assert_eq!(account.login, "ada");
/// assert!(account.cached.is_none());
/// ```
#[macro_export]
macro_rules! record {
    (@field $table:ident, $target:expr, $field:ident) => {
        $crate::Destination::resolve_fields(&mut $target, stringify!($field), $table)
    };
    (@field $table:ident, $target:expr, $field:ident, skip) => {};
    (@field $table:ident, $target:expr, $field:ident, $column:literal) => {
        $crate::Destination::resolve_fields(&mut $target, $column, $table)
    };

    (@empty $ty:ty) => {
        <$ty as $crate::Destination>::allocate()?
    };
    (@empty $ty:ty, skip) => {
        ::std::default::Default::default()
    };
    (@empty $ty:ty, $column:literal) => {
        <$ty as $crate::Destination>::allocate()?
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(=> $tag:tt)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Destination for $name {
            const SHAPE: $crate::Shape = $crate::Shape::Record;
            const DIMENSION: usize = 1;
            type Element = Self;

            fn allocate() -> $crate::Result<Self> {
                Ok(Self {
                    $(
                        $field: $crate::record!(@empty $ty $(, $tag)?),
                    )*
                })
            }

            fn scan_targets<'a>(
                &'a mut self,
                columns: &[$crate::Column],
            ) -> $crate::Result<::std::vec::Vec<$crate::ScanTarget<'a>>> {
                Ok($crate::record_targets(self, columns))
            }

            fn resolve_fields<'a>(&'a mut self, _key: &str, table: &mut $crate::FieldTable<'a>) {
                $(
                    $crate::record!(@field table, self.$field, $field $(, $tag)?);
                )*
            }
        }
    };
}

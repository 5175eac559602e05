//! Sequence and map destinations.
//!
//! At dimension 1 a container is filled from a single row: a sequence gets
//! one element per column and a map one entry per column. At higher
//! dimensions a sequence gets one element per row, each element bound as a
//! destination of its own.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

use rowscan_result::{Error, Result};
use rowscan_types::{Column, Value};

use crate::buffer::{ScanTarget, ScannedRow};
use crate::cell::ListTarget;
use crate::destination::Destination;
use crate::fields::{FieldTable, Leaf};
use crate::shape::Shape;
use crate::slot::Slot;

/// Deepest nesting a repeated destination can have: one element per row,
/// each element filled from a single row.
pub(crate) const MAX_DIMENSION: usize = 2;

pub(crate) fn check_dimension<D: Destination>() -> Result<()> {
    if D::DIMENSION > MAX_DIMENSION {
        return Err(Error::InvalidDimension {
            operation: "scan",
            dimension: D::DIMENSION,
        });
    }
    Ok(())
}

fn scratch_targets<'a>(columns: &[Column]) -> Vec<ScanTarget<'a>> {
    columns.iter().map(|_| ScanTarget::Scratch(Value::Null)).collect()
}

impl<T: Destination> Destination for Vec<T> {
    const SHAPE: Shape = Shape::Sequence;
    const DIMENSION: usize = 1 + T::DIMENSION;
    type Element = T;

    fn validate() -> Result<()> {
        if T::SHAPE == Shape::Channel {
            return Err(Error::unsupported(
                <Self as Destination>::type_name(),
                "sequences of channels cannot be filled",
            ));
        }
        check_dimension::<Self>()?;
        T::validate()
    }

    fn allocate() -> Result<Self> {
        Ok(Vec::new())
    }

    fn next_slot(&mut self) -> Result<Slot<'_, T>> {
        if Self::DIMENSION <= 1 {
            return Err(Error::InvalidDimension {
                operation: "next_slot",
                dimension: Self::DIMENSION,
            });
        }
        self.push(T::allocate()?);
        self.last_mut()
            .map(Slot::Appended)
            .ok_or_else(|| Error::Internal("sequence slot vanished after push".into()))
    }

    fn scan_targets<'a>(&'a mut self, columns: &[Column]) -> Result<Vec<ScanTarget<'a>>> {
        Ok(scratch_targets(columns))
    }

    fn materialize(&mut self, row: ScannedRow, _columns: &[Column]) -> Result<()> {
        self.reserve(row.len());
        for value in row.into_iter().flatten() {
            self.push(T::scan_new(value)?);
        }
        Ok(())
    }

    fn resolve_fields<'a>(&'a mut self, key: &str, table: &mut FieldTable<'a>) {
        table.insert(key, Leaf::List(self));
    }
}

impl<T: Destination> ListTarget for Vec<T> {
    fn assign_list(&mut self, items: Option<Vec<Value>>) -> Result<()> {
        self.clear();
        for item in items.unwrap_or_default() {
            self.push(T::scan_new(item)?);
        }
        Ok(())
    }
}

/// Map keys a column can be stored under.
///
/// A key type accepts column names, column ordinals, or both. When both are
/// accepted the name wins. Types that accept neither are rejected before any
/// row is read.
pub trait MapKey: Sized {
    const ACCEPTS_NAME: bool;
    const ACCEPTS_ORDINAL: bool;

    fn from_name(name: &str) -> Option<Self> {
        let _ = name;
        None
    }

    fn from_ordinal(ordinal: usize) -> Option<Self> {
        let _ = ordinal;
        None
    }
}

pub(crate) fn validate_key<K: MapKey>() -> Result<()> {
    if K::ACCEPTS_NAME || K::ACCEPTS_ORDINAL {
        Ok(())
    } else {
        Err(Error::InvalidKeyType(std::any::type_name::<K>()))
    }
}

fn column_key<K: MapKey>(column: &Column, ordinal: usize) -> Result<K> {
    let by_name = if K::ACCEPTS_NAME {
        K::from_name(&column.name)
    } else {
        None
    };
    by_name
        .or_else(|| K::ACCEPTS_ORDINAL.then(|| K::from_ordinal(ordinal)).flatten())
        .ok_or(Error::InvalidKeyType(std::any::type_name::<K>()))
}

macro_rules! impl_name_key {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                const ACCEPTS_NAME: bool = true;
                const ACCEPTS_ORDINAL: bool = false;

                fn from_name(name: &str) -> Option<Self> {
                    Some(<$ty>::from(name))
                }
            }
        )*
    };
}

impl_name_key!(String, Box<str>, Rc<str>, Arc<str>);

macro_rules! impl_ordinal_key {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                const ACCEPTS_NAME: bool = false;
                const ACCEPTS_ORDINAL: bool = true;

                fn from_ordinal(ordinal: usize) -> Option<Self> {
                    <$ty>::try_from(ordinal).ok()
                }
            }
        )*
    };
}

impl_ordinal_key!(usize, isize, u64, i64);

macro_rules! impl_unusable_key {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                const ACCEPTS_NAME: bool = false;
                const ACCEPTS_ORDINAL: bool = false;
            }
        )*
    };
}

impl_unusable_key!(bool, char, i8, u8, i16, u16, i32, u32);

/// A key that holds either a column name or a column ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnId {
    Name(String),
    Ordinal(usize),
}

impl MapKey for ColumnId {
    const ACCEPTS_NAME: bool = true;
    const ACCEPTS_ORDINAL: bool = true;

    fn from_name(name: &str) -> Option<Self> {
        Some(ColumnId::Name(name.to_string()))
    }

    fn from_ordinal(ordinal: usize) -> Option<Self> {
        Some(ColumnId::Ordinal(ordinal))
    }
}

macro_rules! impl_map_destination {
    ($map:ty, [$($bounds:tt)*]) => {
        impl<$($bounds)*> Destination for $map {
            const SHAPE: Shape = Shape::Map;
            const DIMENSION: usize = 1 + V::DIMENSION;
            type Element = V;

            fn validate() -> Result<()> {
                validate_key::<K>()?;
                if V::DIMENSION > 0 {
                    return Err(Error::unsupported(
                        Self::type_name(),
                        "map values must be scalars",
                    ));
                }
                V::validate()
            }

            fn allocate() -> Result<Self> {
                Ok(Self::default())
            }

            fn scan_targets<'a>(&'a mut self, columns: &[Column]) -> Result<Vec<ScanTarget<'a>>> {
                Ok(scratch_targets(columns))
            }

            fn materialize(&mut self, row: ScannedRow, columns: &[Column]) -> Result<()> {
                for (ordinal, (column, value)) in columns.iter().zip(row).enumerate() {
                    let Some(value) = value else { continue };
                    let key = column_key::<K>(column, ordinal)?;
                    self.insert(key, V::scan_new(value)?);
                }
                Ok(())
            }

            fn resolve_fields<'a>(&'a mut self, key: &str, table: &mut FieldTable<'a>) {
                table.insert(key, Leaf::Unsupported(Self::type_name()));
            }
        }
    };
}

impl_map_destination!(
    HashMap<K, V, S>,
    [K: MapKey + Eq + Hash, V: Destination, S: BuildHasher + Default]
);
impl_map_destination!(BTreeMap<K, V>, [K: MapKey + Ord, V: Destination]);

#[cfg(test)]
mod tests {
    use arrow::datatypes::DataType;
    use rustc_hash::FxHashMap;

    use super::*;

    fn columns(names: &[&str]) -> Vec<Column> {
        names.iter().map(|n| Column::new(*n, DataType::Utf8)).collect()
    }

    fn row(values: Vec<Value>) -> ScannedRow {
        ScannedRow::from_values(values.into_iter().map(Some).collect())
    }

    #[test]
    fn sequences_take_one_element_per_column() {
        let cols = columns(&["a", "b"]);
        let mut out: Vec<String> = Vec::new();
        out.materialize(row(vec![Value::from("x"), Value::Int(2)]), &cols)
            .unwrap();
        assert_eq!(out, vec!["x".to_string(), "2".to_string()]);
    }

    #[test]
    fn named_keys_prefer_column_names() {
        let cols = columns(&["id", "name"]);
        let mut by_id: BTreeMap<ColumnId, Value> = BTreeMap::new();
        by_id
            .materialize(row(vec![Value::Int(1), Value::from("ann")]), &cols)
            .unwrap();
        assert_eq!(by_id[&ColumnId::Name("id".into())], Value::Int(1));
        assert!(!by_id.contains_key(&ColumnId::Ordinal(0)));
    }

    #[test]
    fn ordinal_keys_use_positions() {
        let cols = columns(&["id", "name"]);
        let mut by_pos: FxHashMap<usize, Value> = FxHashMap::default();
        by_pos
            .materialize(row(vec![Value::Int(1), Value::from("ann")]), &cols)
            .unwrap();
        assert_eq!(by_pos[&1], Value::from("ann"));
    }

    #[test]
    fn later_duplicate_columns_win() {
        let cols = columns(&["v", "v"]);
        let mut map: HashMap<String, i64> = HashMap::new();
        map.materialize(row(vec![Value::Int(1), Value::Int(2)]), &cols)
            .unwrap();
        assert_eq!(map["v"], 2);
    }

    #[test]
    fn list_fields_replace_contents() {
        let mut tags = vec![9u32];
        tags.assign_list(Some(vec![Value::Int(1), Value::Int(2)])).unwrap();
        assert_eq!(tags, vec![1, 2]);
        tags.assign_list(None).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn narrow_integer_keys_are_rejected() {
        assert!(matches!(
            validate_key::<i32>(),
            Err(Error::InvalidKeyType("i32"))
        ));
    }
}

//! Column-to-field resolution for record destinations.
//!
//! A record is flattened into a [`FieldTable`]: every leaf field, including
//! the leaves of nested records, is registered under its lower-cased column
//! key in declaration order. Columns then consume entries first-in first-out,
//! so a result with two `name` columns fills the first and second `name`
//! leaves in the order they were declared.

use std::collections::VecDeque;

use rowscan_types::{Column, Value};
use rustc_hash::FxHashMap;

use crate::buffer::ScanTarget;
use crate::cell::{ListTarget, ScanCell};
use crate::destination::Destination;

/// A leaf field reachable from a record.
pub enum Leaf<'a> {
    Scalar(&'a mut dyn ScanCell),
    List(&'a mut dyn ListTarget),
    /// A field whose type cannot be filled from a column.
    Unsupported(&'static str),
    /// A shared handle that cannot be mutated.
    Unsettable(&'static str),
}

/// Leaves of one record, keyed by lower-cased column key.
#[derive(Default)]
pub struct FieldTable<'a> {
    fields: FxHashMap<String, VecDeque<Leaf<'a>>>,
}

impl<'a> FieldTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens `record` into a new table.
    pub fn build<D: Destination>(record: &'a mut D) -> Self {
        let mut table = Self::new();
        record.resolve_fields("", &mut table);
        tracing::trace!(
            record = D::type_name(),
            keys = table.fields.len(),
            "resolved record fields"
        );
        table
    }

    pub fn insert(&mut self, key: &str, leaf: Leaf<'a>) {
        self.fields
            .entry(key.to_lowercase())
            .or_default()
            .push_back(leaf);
    }

    /// Removes and returns the earliest unconsumed leaf for `key`.
    pub fn consume(&mut self, key: &str) -> Option<Leaf<'a>> {
        self.fields.get_mut(&key.to_lowercase())?.pop_front()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields
            .get(&key.to_lowercase())
            .is_some_and(|leaves| !leaves.is_empty())
    }

    /// Number of unconsumed leaves.
    pub fn len(&self) -> usize {
        self.fields.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scan targets for a record: each column takes the next matching leaf, and
/// unmatched columns are read into scratch cells and discarded.
pub fn record_targets<'a, D: Destination>(
    record: &'a mut D,
    columns: &[Column],
) -> Vec<ScanTarget<'a>> {
    let mut table = FieldTable::build(record);
    columns
        .iter()
        .map(|column| match table.consume(&column.name) {
            Some(leaf) => ScanTarget::from(leaf),
            None => {
                tracing::trace!(column = %column.name, "no field for column");
                ScanTarget::Scratch(Value::Null)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_keys_are_consumed_in_order() {
        let mut first = 0i64;
        let mut second = 0i64;
        let mut table = FieldTable::new();
        table.insert("Id", Leaf::Scalar(&mut first));
        table.insert("id", Leaf::Scalar(&mut second));
        assert_eq!(table.len(), 2);

        let Some(Leaf::Scalar(cell)) = table.consume("ID") else {
            panic!("expected first id leaf");
        };
        cell.scan_value(Value::Int(1)).unwrap();
        let Some(Leaf::Scalar(cell)) = table.consume("id") else {
            panic!("expected second id leaf");
        };
        cell.scan_value(Value::Int(2)).unwrap();
        assert!(table.consume("id").is_none());
        assert!(!table.contains_key("id"));
        drop(table);

        assert_eq!((first, second), (1, 2));
    }
}

//! Per-row scan buffers.

use std::fmt;

use rowscan_result::{Error, Result};
use rowscan_types::Value;

use crate::adapter::ListAdapter;
use crate::cell::{ListTarget, ScanCell};
use crate::fields::Leaf;

/// Where one column of the current row is written.
pub enum ScanTarget<'a> {
    /// Scanned in place into a destination field.
    Field(&'a mut dyn ScanCell),
    /// A sequence field, filled through the cursor's list adapter.
    List(&'a mut dyn ListTarget),
    /// Held until materialization.
    Scratch(Value),
    Unsupported(&'static str),
    Unsettable(&'static str),
}

impl<'a> From<Leaf<'a>> for ScanTarget<'a> {
    fn from(leaf: Leaf<'a>) -> Self {
        match leaf {
            Leaf::Scalar(cell) => ScanTarget::Field(cell),
            Leaf::List(list) => ScanTarget::List(list),
            Leaf::Unsupported(type_name) => ScanTarget::Unsupported(type_name),
            Leaf::Unsettable(type_name) => ScanTarget::Unsettable(type_name),
        }
    }
}

impl fmt::Debug for ScanTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanTarget::Field(cell) => write!(f, "Field({})", cell.cell_type_name()),
            ScanTarget::List(list) => write!(f, "List({})", list.list_type_name()),
            ScanTarget::Scratch(value) => write!(f, "Scratch({value})"),
            ScanTarget::Unsupported(type_name) => write!(f, "Unsupported({type_name})"),
            ScanTarget::Unsettable(type_name) => write!(f, "Unsettable({type_name})"),
        }
    }
}

/// The ordered scan targets for one row, as handed to a
/// [`RowCursor`](crate::RowCursor).
pub struct RowBuffer<'a, 'r> {
    targets: Vec<ScanTarget<'a>>,
    adapter: &'r dyn ListAdapter,
}

impl<'a, 'r> RowBuffer<'a, 'r> {
    pub fn new(targets: Vec<ScanTarget<'a>>, adapter: &'r dyn ListAdapter) -> Self {
        Self { targets, adapter }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Writes the value of column `ordinal`.
    pub fn set(&mut self, ordinal: usize, value: Value) -> Result<()> {
        let len = self.targets.len();
        let target = self
            .targets
            .get_mut(ordinal)
            .ok_or(Error::ColumnCountMismatch {
                expected: ordinal + 1,
                got: len,
            })?;
        match target {
            ScanTarget::Field(cell) => cell.scan_value(value),
            ScanTarget::List(list) => list.assign_list(self.adapter.decode_list(value)?),
            ScanTarget::Scratch(slot) => {
                *slot = value;
                Ok(())
            }
            ScanTarget::Unsupported(type_name) => {
                Err(Error::type_mismatch(*type_name, value.type_name()))
            }
            ScanTarget::Unsettable(type_name) => Err(Error::NotSettable(*type_name)),
        }
    }

    /// Ends the row, releasing field borrows and keeping scratch values.
    pub fn finish(self) -> ScannedRow {
        let values = self
            .targets
            .into_iter()
            .map(|target| match target {
                ScanTarget::Scratch(value) => Some(value),
                _ => None,
            })
            .collect();
        ScannedRow { values }
    }
}

impl fmt::Debug for RowBuffer<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowBuffer")
            .field("targets", &self.targets)
            .field("adapter", &self.adapter.name())
            .finish()
    }
}

/// Scratch values of a scanned row, one entry per column. Columns scanned in
/// place are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScannedRow {
    values: Vec<Option<Value>>,
}

impl ScannedRow {
    pub fn from_values(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Option<&Value> {
        self.values.get(ordinal).and_then(Option::as_ref)
    }
}

impl IntoIterator for ScannedRow {
    type Item = Option<Value>;
    type IntoIter = std::vec::IntoIter<Option<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

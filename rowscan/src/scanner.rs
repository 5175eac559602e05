//! Scan orchestration.
//!
//! The [`Scanner`] drives a [`RowCursor`] into a destination. Single-row
//! destinations (dimension 0 or 1) are filled from the first row and fail
//! with [`Error::NoRows`] when there is none. Repeated destinations get one
//! element per row; an empty result leaves them empty unless
//! [`ScanOptions::require_rows`] is set.

use std::fmt;
use std::sync::Arc;

use rowscan_result::{Error, Result};

use crate::adapter::ListAdapter;
use crate::binder::Binder;
use crate::buffer::RowBuffer;
use crate::cursor::RowCursor;
use crate::destination::Destination;

/// Options that change how rows are bound.
#[derive(Clone, Default)]
pub struct ScanOptions {
    /// Fail with [`Error::NoRows`] when a repeated destination sees no rows.
    pub require_rows: bool,
    /// Overrides the cursor's list adapter for sequence fields.
    pub list_adapter: Option<Arc<dyn ListAdapter>>,
}

impl fmt::Debug for ScanOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanOptions")
            .field("require_rows", &self.require_rows)
            .field("list_adapter", &self.list_adapter.as_ref().map(|a| a.name()))
            .finish()
    }
}

/// Binds the rows of a cursor to destinations.
pub struct Scanner<C> {
    cursor: Option<C>,
    deferred: Option<Error>,
    options: ScanOptions,
}

impl<C: RowCursor> Scanner<C> {
    pub fn new(cursor: C) -> Self {
        Self {
            cursor: Some(cursor),
            deferred: None,
            options: ScanOptions::default(),
        }
    }

    /// Accepts the result of running a query. A failed query is reported by
    /// the first call to [`Scanner::scan`].
    pub fn from_result<E: Into<Error>>(result: std::result::Result<C, E>) -> Self {
        match result {
            Ok(cursor) => Self::new(cursor),
            Err(err) => Self {
                cursor: None,
                deferred: Some(err.into()),
                options: ScanOptions::default(),
            },
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Releases the cursor.
    pub fn into_inner(self) -> Option<C> {
        self.cursor
    }

    pub fn scan<D: Destination>(&mut self, dest: &mut D) -> Result<()> {
        self.scan_opt(Some(dest))
    }

    /// Like [`Scanner::scan`], with an optional destination handle. `None`
    /// fails with [`Error::NilDestination`].
    pub fn scan_opt<D: Destination>(&mut self, dest: Option<&mut D>) -> Result<()> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        let Self {
            cursor, options, ..
        } = self;
        let cursor = cursor
            .as_mut()
            .ok_or_else(|| Error::Cursor("no row cursor to scan".into()))?;
        if let Some(err) = cursor.error() {
            return Err(err);
        }

        let mut binder = Binder::new(dest)?;
        let adapter: &dyn ListAdapter = match &options.list_adapter {
            Some(adapter) => adapter.as_ref(),
            None => cursor.list_adapter(),
        };

        if binder.expects_single_row() {
            if !cursor.advance() {
                return Err(cursor.error().unwrap_or(Error::NoRows));
            }
            scan_row(cursor, &mut binder, adapter)?;
            tracing::trace!(destination = D::type_name(), "scanned single row");
        } else {
            let rows = scan_all_rows(cursor, &mut binder, adapter)?;
            tracing::debug!(destination = D::type_name(), rows, "scanned rows");
            if rows == 0 && options.require_rows {
                if let Some(err) = cursor.error() {
                    return Err(err);
                }
                return Err(Error::NoRows);
            }
        }

        match cursor.error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Scans every row of `cursor` into `dest`.
pub fn scan<C: RowCursor, D: Destination>(cursor: C, dest: &mut D) -> Result<()> {
    Scanner::new(cursor).scan(dest)
}

fn scan_row<C, D>(
    cursor: &mut C,
    binder: &mut Binder<'_, D>,
    adapter: &dyn ListAdapter,
) -> Result<()>
where
    C: RowCursor + ?Sized,
    D: Destination,
{
    let columns = cursor.columns()?;
    let row = {
        let targets = binder.build_scan_targets(&columns)?;
        let mut buffer = RowBuffer::new(targets, adapter);
        cursor.scan_into(&mut buffer)?;
        buffer.finish()
    };
    binder.materialize(row, &columns)
}

fn scan_all_rows<C, D>(
    cursor: &mut C,
    binder: &mut Binder<'_, D>,
    adapter: &dyn ListAdapter,
) -> Result<usize>
where
    C: RowCursor + ?Sized,
    D: Destination,
{
    let mut rows = 0usize;
    while cursor.advance() {
        let mut slot = binder.next_slot()?;
        {
            let mut element = Binder::new(Some(slot.target()))?;
            if element.expects_single_row() {
                scan_row(cursor, &mut element, adapter)?;
            } else {
                return Err(Error::InvalidDimension {
                    operation: "scan_row",
                    dimension: element.dimension(),
                });
            }
        }
        slot.commit()?;
        rows += 1;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use rowscan_types::Value;

    use super::*;
    use crate::cursor::MemCursor;

    #[test]
    fn deferred_errors_surface_on_first_scan() {
        let mut scanner =
            Scanner::<MemCursor>::from_result(Err(Error::Cursor("query failed".into())));
        let mut n = 0i64;
        assert!(matches!(scanner.scan(&mut n), Err(Error::Cursor(msg)) if msg == "query failed"));
        assert!(matches!(scanner.scan(&mut n), Err(Error::Cursor(_))));
    }

    #[test]
    fn single_row_destinations_need_a_row() {
        let cursor = MemCursor::from_rows(&["n"], Vec::new());
        let mut n = 0i64;
        assert!(matches!(scan(cursor, &mut n), Err(Error::NoRows)));
    }

    #[test]
    fn empty_results_leave_sequences_empty() {
        let cursor = MemCursor::from_rows(&["n"], Vec::new());
        let mut out: Vec<Vec<i64>> = Vec::new();
        scan(cursor, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn require_rows_rejects_empty_results() {
        let cursor = MemCursor::from_rows(&["n"], Vec::new());
        let mut out: Vec<Vec<i64>> = Vec::new();
        let mut scanner = Scanner::new(cursor).with_options(ScanOptions {
            require_rows: true,
            ..ScanOptions::default()
        });
        assert!(matches!(scanner.scan(&mut out), Err(Error::NoRows)));
    }

    #[test]
    fn cursor_faults_pass_through() {
        let cursor = MemCursor::from_rows(
            &["n"],
            vec![vec![Value::Int(1)], vec![Value::Int(2)], vec![Value::Int(3)]],
        )
        .fail_after(2, Error::Cursor("reset".into()));
        let mut out: Vec<Vec<i64>> = Vec::new();
        let err = scan(cursor, &mut out).unwrap_err();
        assert!(matches!(err, Error::Cursor(msg) if msg == "reset"));
        assert_eq!(out, vec![vec![1], vec![2]]);
    }

    #[test]
    fn only_the_first_row_fills_a_single_destination() {
        let cursor = MemCursor::from_rows(&["n"], vec![vec![Value::Int(1)], vec![Value::Int(2)]]);
        let mut n = 0i64;
        scan(cursor, &mut n).unwrap();
        assert_eq!(n, 1);
    }
}

//! Tables filters are evaluated against, and per-evaluation column binding.

use arrow::{
    array::{Array, ArrayRef},
    compute::cast,
    record_batch::RecordBatch,
};

use crate::{
    column::{AnyColumnRef, ColumnType},
    error::FilterError,
    logging::{colfilter_log, LogContext},
    selection::RowId,
};

/// Read-only columnar data a filter can be evaluated against.
///
/// Every column reachable through [`Table::column_by_name`] must hold exactly
/// [`Table::row_count`] rows.
pub trait Table {
    /// Number of rows; row identifiers are `0..row_count()`.
    fn row_count(&self) -> usize;

    /// Looks up a column by exact name.
    fn column_by_name(&self, name: &str) -> Option<&ArrayRef>;
}

impl Table for RecordBatch {
    fn row_count(&self) -> usize {
        self.num_rows()
    }

    fn column_by_name(&self, name: &str) -> Option<&ArrayRef> {
        RecordBatch::column_by_name(self, name)
    }
}

/// Resolves column references against one table for the duration of an
/// evaluation.
pub(crate) struct Binder<'t> {
    table: &'t dyn Table,
    rows: RowId,
    log_context: LogContext,
}

impl<'t> Binder<'t> {
    pub(crate) fn new(table: &'t dyn Table, log_context: LogContext) -> Result<Self, FilterError> {
        let count = table.row_count();
        let rows = RowId::try_from(count).map_err(|_| FilterError::TooManyRows(count))?;
        Ok(Self {
            table,
            rows,
            log_context,
        })
    }

    pub(crate) fn rows(&self) -> RowId {
        self.rows
    }

    /// Returns the column normalized to the canonical layout of its tag.
    pub(crate) fn bind(&self, column: &AnyColumnRef) -> Result<ArrayRef, FilterError> {
        let result = self.try_bind(column);
        match &result {
            Ok(array) => colfilter_log!(
                log::Level::Trace,
                ctx: self.log_context,
                "column_bind",
                "column={} type={} layout={:?}",
                column.name(),
                column.column_type(),
                array.data_type()
            ),
            Err(err) => colfilter_log!(
                log::Level::Debug,
                ctx: self.log_context,
                "column_bind_failed",
                "column={} error={}",
                column.name(),
                err
            ),
        }
        result
    }

    fn try_bind(&self, column: &AnyColumnRef) -> Result<ArrayRef, FilterError> {
        let array = self
            .table
            .column_by_name(column.name())
            .ok_or_else(|| FilterError::ColumnNotFound(column.name().to_string()))?;
        let actual = array.data_type();
        if ColumnType::of(actual) != Some(column.column_type()) {
            return Err(FilterError::TypeMismatch {
                column: column.name().to_string(),
                expected: column.column_type(),
                actual: actual.clone(),
            });
        }
        if array.len() != self.rows as usize {
            return Err(FilterError::LengthMismatch {
                column: column.name().to_string(),
                expected: self.rows as usize,
                actual: array.len(),
            });
        }
        let canonical = column.column_type().canonical(actual);
        if *actual == canonical {
            Ok(ArrayRef::clone(array))
        } else {
            Ok(cast(array, &canonical)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{ArrayRef, Int16Array, StringArray},
        datatypes::DataType,
    };

    use super::{Binder, Table};
    use crate::{
        column::{AnyColumnRef, ColumnType},
        error::FilterError,
        logging::LogContext,
    };

    struct Columns {
        rows: usize,
        columns: Vec<(&'static str, ArrayRef)>,
    }

    impl Table for Columns {
        fn row_count(&self) -> usize {
            self.rows
        }

        fn column_by_name(&self, name: &str) -> Option<&ArrayRef> {
            self.columns
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map(|(_, array)| array)
        }
    }

    fn table() -> Columns {
        Columns {
            rows: 3,
            columns: vec![
                ("n", Arc::new(Int16Array::from(vec![1, 2, 3])) as ArrayRef),
                ("s", Arc::new(StringArray::from(vec!["a", "b", "c"])) as ArrayRef),
                ("short", Arc::new(Int16Array::from(vec![1])) as ArrayRef),
            ],
        }
    }

    #[test]
    fn binds_and_normalizes_layout() {
        let table = table();
        let binder = Binder::new(&table, LogContext::default()).expect("binder");
        assert_eq!(binder.rows(), 3);

        let bound = binder
            .bind(&AnyColumnRef::new("n", ColumnType::Number))
            .expect("bind n");
        assert_eq!(bound.data_type(), &DataType::Float64);

        let bound = binder
            .bind(&AnyColumnRef::new("s", ColumnType::String))
            .expect("bind s");
        assert_eq!(bound.data_type(), &DataType::Utf8);
    }

    #[test]
    fn reports_binding_failures() {
        let table = table();
        let binder = Binder::new(&table, LogContext::default()).expect("binder");

        let err = binder
            .bind(&AnyColumnRef::new("missing", ColumnType::Number))
            .unwrap_err();
        assert!(matches!(err, FilterError::ColumnNotFound(name) if name == "missing"));

        let err = binder
            .bind(&AnyColumnRef::new("s", ColumnType::Number))
            .unwrap_err();
        assert!(matches!(
            err,
            FilterError::TypeMismatch {
                expected: ColumnType::Number,
                actual: DataType::Utf8,
                ..
            }
        ));

        let err = binder
            .bind(&AnyColumnRef::new("short", ColumnType::Number))
            .unwrap_err();
        assert!(matches!(
            err,
            FilterError::LengthMismatch {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn row_count_must_fit_row_ids() {
        let table = Columns {
            rows: u32::MAX as usize + 1,
            columns: Vec::new(),
        };
        assert!(matches!(
            Binder::new(&table, LogContext::default()),
            Err(FilterError::TooManyRows(_))
        ));
    }
}

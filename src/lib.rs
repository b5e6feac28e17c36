#![deny(missing_docs)]
//! Deferred, composable row filters for Arrow tables.
//!
//! A filter names a column and a test, and is only bound to data when it is
//! evaluated. Filters combine into trees through `AllOf`, `AnyOf` and `Not`;
//! evaluating a tree against a [`Table`] yields the [`Selection`] of matching
//! row positions.
//!
//! ```
//! use std::sync::Arc;
//!
//! use arrow::{
//!     array::{Float64Array, StringArray},
//!     datatypes::{DataType, Field, Schema},
//!     record_batch::RecordBatch,
//! };
//! use colfilter::{all_of, not, number_column, string_column};
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("age", DataType::Float64, true),
//!     Field::new("name", DataType::Utf8, false),
//! ]));
//! let batch = RecordBatch::try_new(
//!     schema,
//!     vec![
//!         Arc::new(Float64Array::from(vec![Some(10.0), Some(20.0), Some(30.0), None])),
//!         Arc::new(StringArray::from(vec!["a", "b", "c", "d"])),
//!     ],
//! )?;
//!
//! let older = number_column("age").is_greater_than(15.0);
//! assert_eq!(older.evaluate(&batch)?.to_vec(), vec![1, 2]);
//! assert_eq!(not(older.clone()).evaluate(&batch)?.to_vec(), vec![0, 3]);
//!
//! let named_c = all_of([older, string_column("name").is_equal_to("c")])?;
//! assert_eq!(named_c.evaluate(&batch)?.to_vec(), vec![2]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Missing cells (Arrow nulls, and NaN in number columns) never satisfy a
//! test other than `is_missing`, which is why row 3 above shows up under
//! `not`.

mod logging;
mod scalar;

/// Typed column references and their operators.
pub mod column;

/// Error taxonomy.
pub mod error;

/// Filter trees and their evaluation.
pub mod filter;

/// Evaluation options.
pub mod option;

/// Free-function builders.
pub mod query;

/// Row selections.
pub mod selection;

/// Tables and column binding.
pub mod table;

pub use crate::{
    column::{AnyColumnRef, ColumnKind, ColumnRef, ColumnType, ComparisonOp, Operand},
    error::FilterError,
    filter::{Filter, FilterNode, FilterVisitor, LeafFilter, LeafPredicate},
    logging::LogContext,
    option::EvalOptions,
    query::{
        all_of, and, any_of, boolean_column, both, date_column, date_time_column, either,
        not, number_column, or, string_column, time_column,
    },
    scalar::ScalarValue,
    selection::{RowId, Selection},
    table::Table,
};

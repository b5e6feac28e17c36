//! Error taxonomy for filter construction and evaluation.

use arrow::{datatypes::DataType, error::ArrowError};
use thiserror::Error;

use crate::column::ColumnType;

/// Errors raised while building or evaluating a [`Filter`](crate::Filter).
///
/// Construction-time variants (`InvalidFilter`, `OperandType`,
/// `UnsupportedOperator`, `InvalidPattern`) are returned by the constructor that
/// detected them. Every other variant aborts the whole evaluation; no partial
/// selection is ever produced.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A composite was built without any child filter.
    #[error("invalid filter: {op} requires at least one child filter")]
    InvalidFilter {
        /// Composite being constructed (`all_of` / `any_of`).
        op: &'static str,
    },
    /// The bound table has no column with the referenced name.
    #[error("unknown column: {0}")]
    ColumnNotFound(String),
    /// The bound column's runtime type differs from the reference's type tag.
    #[error("type mismatch for column '{column}': expected {expected} column, got {actual:?}")]
    TypeMismatch {
        /// Referenced column name.
        column: String,
        /// Type tag carried by the reference.
        expected: ColumnType,
        /// Arrow type of the column found in the table.
        actual: DataType,
    },
    /// A runtime operand cannot be compared against the column's values.
    #[error("operand of type {operand} is not compatible with {expected} column '{column}'")]
    OperandType {
        /// Referenced column name.
        column: String,
        /// Type tag carried by the reference.
        expected: ColumnType,
        /// Type name of the rejected operand.
        operand: &'static str,
    },
    /// The operator has no meaning for the column's type.
    #[error("unsupported operator {op} for {column_type} column '{column}'")]
    UnsupportedOperator {
        /// Referenced column name.
        column: String,
        /// Type tag carried by the reference.
        column_type: ColumnType,
        /// Operator symbol.
        op: &'static str,
    },
    /// A regular-expression operand failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern as supplied by the caller.
        pattern: String,
        /// Underlying compile error.
        #[source]
        source: regex::Error,
    },
    /// A column's length disagrees with the table's row count.
    #[error("column '{column}' has {actual} rows but the table has {expected}")]
    LengthMismatch {
        /// Column name.
        column: String,
        /// Table row count.
        expected: usize,
        /// Column length.
        actual: usize,
    },
    /// The table has more rows than a selection can address.
    #[error("table has {0} rows, more than a selection can address")]
    TooManyRows(usize),
    /// The filter tree is nested deeper than the configured limit.
    #[error("filter depth {depth} exceeds the configured limit of {limit}")]
    DepthExceeded {
        /// Depth of the rejected filter tree.
        depth: usize,
        /// Configured limit.
        limit: usize,
    },
    /// Arrow failed to normalize a column into its canonical layout.
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

use std::fmt;

use arrow::{
    array::{Array, AsArray},
    datatypes::Float64Type,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    column::{
        AnyColumnRef, BooleanPredicate, ColumnType, DateKind, DateTimeKind, NumberPredicate,
        StringPredicate, TemporalPredicate, TimeKind,
    },
    error::FilterError,
    selection::Selection,
    table::Binder,
};

/// A single column test: the column it reads and the predicate applied to
/// every row of it.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafFilter {
    column: AnyColumnRef,
    predicate: LeafPredicate,
}

/// Predicate of a leaf filter, one family per column type.
#[derive(Clone, Debug, PartialEq)]
pub enum LeafPredicate {
    /// Null check; NaN counts as missing in number columns.
    Missing {
        /// True when representing "is not missing".
        negated: bool,
    },
    /// String column test.
    String(StringPredicate),
    /// Number column test.
    Number(NumberPredicate),
    /// Date column test.
    Date(TemporalPredicate<NaiveDate>),
    /// Timestamp column test.
    DateTime(TemporalPredicate<NaiveDateTime>),
    /// Time-of-day column test.
    Time(TemporalPredicate<NaiveTime>),
    /// Boolean column test.
    Boolean(BooleanPredicate),
}

impl LeafPredicate {
    /// Second column read by the predicate, for column-to-column comparisons.
    #[must_use]
    pub fn operand_column(&self) -> Option<&AnyColumnRef> {
        match self {
            LeafPredicate::Missing { .. } | LeafPredicate::Boolean(_) => None,
            LeafPredicate::String(predicate) => predicate.operand_column(),
            LeafPredicate::Number(predicate) => predicate.operand_column(),
            LeafPredicate::Date(predicate) => predicate.operand_column(),
            LeafPredicate::DateTime(predicate) => predicate.operand_column(),
            LeafPredicate::Time(predicate) => predicate.operand_column(),
        }
    }
}

impl LeafFilter {
    pub(crate) fn new(column: AnyColumnRef, predicate: LeafPredicate) -> Self {
        Self { column, predicate }
    }

    /// Column the filter is evaluated against.
    #[must_use]
    pub fn column(&self) -> &AnyColumnRef {
        &self.column
    }

    /// Predicate applied to every row.
    #[must_use]
    pub fn predicate(&self) -> &LeafPredicate {
        &self.predicate
    }

    pub(crate) fn select(&self, binder: &Binder<'_>) -> Result<Selection, FilterError> {
        let array = binder.bind(&self.column)?;
        let column = &self.column;
        match &self.predicate {
            LeafPredicate::Missing { negated } => {
                let floats = match column.column_type() {
                    ColumnType::Number => array.as_primitive_opt::<Float64Type>(),
                    _ => None,
                };
                Ok(Selection::from_fn(binder.rows(), |row| {
                    let missing = array.is_null(row)
                        || floats.is_some_and(|values| values.value(row).is_nan());
                    missing != *negated
                }))
            }
            LeafPredicate::String(predicate) => predicate.select(column, &array, binder),
            LeafPredicate::Number(predicate) => predicate.select(column, &array, binder),
            LeafPredicate::Date(predicate) => predicate.select::<DateKind>(column, &array, binder),
            LeafPredicate::DateTime(predicate) => {
                predicate.select::<DateTimeKind>(column, &array, binder)
            }
            LeafPredicate::Time(predicate) => predicate.select::<TimeKind>(column, &array, binder),
            LeafPredicate::Boolean(predicate) => predicate.select(column, &array, binder),
        }
    }
}

impl fmt::Display for LeafFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.column)?;
        match &self.predicate {
            LeafPredicate::Missing { negated: false } => f.write_str("is missing"),
            LeafPredicate::Missing { negated: true } => f.write_str("is not missing"),
            LeafPredicate::String(predicate) => predicate.fmt(f),
            LeafPredicate::Number(predicate) => predicate.fmt(f),
            LeafPredicate::Date(predicate) => predicate.fmt(f),
            LeafPredicate::DateTime(predicate) => predicate.fmt(f),
            LeafPredicate::Time(predicate) => predicate.fmt(f),
            LeafPredicate::Boolean(predicate) => predicate.fmt(f),
        }
    }
}

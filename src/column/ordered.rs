use std::{cmp::Ordering, fmt};

use arrow::{
    array::{Array, ArrayRef, AsArray, PrimitiveArray},
    datatypes::{
        ArrowPrimitiveType, Date32Type, Float64Type, Time64NanosecondType,
        TimestampMicrosecondType,
    },
};

use super::{AnyColumnRef, ColumnKind, DateKind, DateTimeKind, NumberKind, Operand, TimeKind};
use crate::{error::FilterError, selection::Selection, table::Binder};

/// Comparison operator used by ordered predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equals (`=`).
    Equal,
    /// Not equals (`!=`).
    NotEqual,
    /// Less than (`<`).
    LessThan,
    /// Less than or equal to (`<=`).
    LessThanOrEqual,
    /// Greater than (`>`).
    GreaterThan,
    /// Greater than or equal to (`>=`).
    GreaterThanOrEqual,
}

impl ComparisonOp {
    /// Returns a textual representation of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqual => ">=",
        }
    }

    /// Evaluates the operator against a comparison ordering.
    #[must_use]
    pub fn test_ordering(self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Equal => ordering == Ordering::Equal,
            ComparisonOp::NotEqual => ordering != Ordering::Equal,
            ComparisonOp::LessThan => ordering == Ordering::Less,
            ComparisonOp::LessThanOrEqual => ordering != Ordering::Greater,
            ComparisonOp::GreaterThan => ordering == Ordering::Greater,
            ComparisonOp::GreaterThanOrEqual => ordering != Ordering::Less,
        }
    }

    /// `None` orderings (NaN against anything) never satisfy an operator.
    pub(crate) fn test<V: PartialOrd + ?Sized>(self, lhs: &V, rhs: &V) -> bool {
        lhs.partial_cmp(rhs)
            .is_some_and(|ordering| self.test_ordering(ordering))
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order-based tests shared by number and temporal columns.
#[derive(Clone, Debug, PartialEq)]
pub enum OrderedTest<V> {
    /// `column <op> operand`.
    Compare {
        /// Operator.
        op: ComparisonOp,
        /// Literal or column on the right-hand side.
        operand: Operand<V>,
    },
    /// `low <= column <= high`, or strict bounds when `inclusive` is false.
    Between {
        /// Lower bound.
        low: V,
        /// Upper bound.
        high: V,
        /// Whether the bounds themselves match.
        inclusive: bool,
    },
    /// Membership in a literal list.
    In {
        /// Candidate values.
        values: Vec<V>,
        /// True when representing `NOT IN`.
        negated: bool,
    },
}

impl<V: PartialOrd> OrderedTest<V> {
    pub(crate) fn select<K>(
        &self,
        values: &PrimitiveArray<K::Native>,
        binder: &Binder<'_>,
    ) -> Result<Selection, FilterError>
    where
        K: PrimitiveKind<Value = V>,
    {
        let rows = binder.rows();
        let selection = match self {
            OrderedTest::Compare {
                op,
                operand: Operand::Literal(rhs),
            } => Selection::from_fn(rows, |row| {
                K::cell(values, row).is_some_and(|lhs| op.test(&lhs, rhs))
            }),
            OrderedTest::Compare {
                op,
                operand: Operand::Column(other),
            } => {
                let bound = binder.bind(other)?;
                let others = downcast_primitive::<K>(other, &bound)?;
                Selection::from_fn(rows, |row| {
                    match (K::cell(values, row), K::cell(others, row)) {
                        (Some(lhs), Some(rhs)) => op.test(&lhs, &rhs),
                        _ => false,
                    }
                })
            }
            OrderedTest::Between {
                low,
                high,
                inclusive,
            } => Selection::from_fn(rows, |row| {
                K::cell(values, row).is_some_and(|value| {
                    if *inclusive {
                        *low <= value && value <= *high
                    } else {
                        *low < value && value < *high
                    }
                })
            }),
            OrderedTest::In { values: list, negated } => Selection::from_fn(rows, |row| {
                K::cell(values, row)
                    .is_some_and(|value| list.iter().any(|candidate| *candidate == value) != *negated)
            }),
        };
        Ok(selection)
    }

    pub(crate) fn operand_column(&self) -> Option<&AnyColumnRef> {
        match self {
            OrderedTest::Compare { operand, .. } => operand.column(),
            OrderedTest::Between { .. } | OrderedTest::In { .. } => None,
        }
    }
}

impl<V: fmt::Display> fmt::Display for OrderedTest<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderedTest::Compare { op, operand } => write!(f, "{op} {operand}"),
            OrderedTest::Between {
                low,
                high,
                inclusive: true,
            } => write!(f, "between [{low}, {high}]"),
            OrderedTest::Between {
                low,
                high,
                inclusive: false,
            } => write!(f, "between ({low}, {high})"),
            OrderedTest::In { values, negated } => {
                f.write_str(if *negated { "not in (" } else { "in (" })?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    value.fmt(f)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Column kinds whose canonical Arrow layout is a primitive array.
pub(crate) trait PrimitiveKind: ColumnKind {
    type Native: ArrowPrimitiveType;

    /// Reads row `row`; missing cells yield `None`.
    fn cell(values: &PrimitiveArray<Self::Native>, row: usize) -> Option<Self::Value>;
}

impl PrimitiveKind for NumberKind {
    type Native = Float64Type;

    // NaN is treated as a missing number.
    fn cell(values: &PrimitiveArray<Float64Type>, row: usize) -> Option<f64> {
        if values.is_null(row) {
            return None;
        }
        let value = values.value(row);
        (!value.is_nan()).then_some(value)
    }
}

impl PrimitiveKind for DateKind {
    type Native = Date32Type;

    fn cell(values: &PrimitiveArray<Date32Type>, row: usize) -> Option<Self::Value> {
        if values.is_null(row) {
            None
        } else {
            values.value_as_date(row)
        }
    }
}

impl PrimitiveKind for DateTimeKind {
    type Native = TimestampMicrosecondType;

    fn cell(values: &PrimitiveArray<TimestampMicrosecondType>, row: usize) -> Option<Self::Value> {
        if values.is_null(row) {
            None
        } else {
            values.value_as_datetime(row)
        }
    }
}

impl PrimitiveKind for TimeKind {
    type Native = Time64NanosecondType;

    fn cell(values: &PrimitiveArray<Time64NanosecondType>, row: usize) -> Option<Self::Value> {
        if values.is_null(row) {
            None
        } else {
            values.value_as_time(row)
        }
    }
}

/// Views a canonicalized column as the primitive array of kind `K`.
pub(crate) fn downcast_primitive<'a, K: PrimitiveKind>(
    column: &AnyColumnRef,
    array: &'a ArrayRef,
) -> Result<&'a PrimitiveArray<K::Native>, FilterError> {
    array
        .as_primitive_opt::<K::Native>()
        .ok_or_else(|| FilterError::TypeMismatch {
            column: column.name().to_string(),
            expected: K::TYPE,
            actual: array.data_type().clone(),
        })
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::ComparisonOp;

    #[test]
    fn comparison_op_tests_orderings() {
        assert!(ComparisonOp::LessThanOrEqual.test_ordering(Ordering::Equal));
        assert!(!ComparisonOp::LessThan.test_ordering(Ordering::Equal));
        assert!(ComparisonOp::NotEqual.test_ordering(Ordering::Greater));
        assert!(ComparisonOp::GreaterThanOrEqual.test_ordering(Ordering::Greater));
        assert_eq!(ComparisonOp::NotEqual.to_string(), "!=");
    }

    #[test]
    fn unordered_values_never_match() {
        for op in [
            ComparisonOp::Equal,
            ComparisonOp::NotEqual,
            ComparisonOp::LessThan,
            ComparisonOp::GreaterThanOrEqual,
        ] {
            assert!(!op.test(&f64::NAN, &1.0));
        }
        assert!(ComparisonOp::GreaterThan.test(&2.0, &1.0));
    }
}

use std::fmt;

use arrow::array::ArrayRef;

use super::{
    downcast_primitive, AnyColumnRef, ColumnRef, ComparisonOp, NumberKind, Operand, OrderedTest,
    PrimitiveKind,
};
use crate::{
    error::FilterError,
    filter::{Filter, LeafPredicate},
    selection::Selection,
    table::Binder,
};

/// Predicates over number columns.
#[derive(Clone, Debug, PartialEq)]
pub enum NumberPredicate {
    /// Comparison, range or membership test.
    Ordered(OrderedTest<f64>),
    /// `|value - target| <= margin`.
    CloseTo {
        /// Target value.
        target: f64,
        /// Allowed absolute distance.
        margin: f64,
    },
    /// `value == 0`.
    Zero,
    /// `value > 0`.
    Positive,
    /// `value < 0`.
    Negative,
    /// `value >= 0`.
    NonNegative,
}

impl NumberPredicate {
    pub(crate) fn select(
        &self,
        column: &AnyColumnRef,
        array: &ArrayRef,
        binder: &Binder<'_>,
    ) -> Result<Selection, FilterError> {
        let values = downcast_primitive::<NumberKind>(column, array)?;
        let test: fn(f64) -> bool = match self {
            NumberPredicate::Ordered(test) => return test.select::<NumberKind>(values, binder),
            NumberPredicate::CloseTo { target, margin } => {
                let (target, margin) = (*target, *margin);
                return Ok(Selection::from_fn(binder.rows(), |row| {
                    NumberKind::cell(values, row).is_some_and(|v| (v - target).abs() <= margin)
                }));
            }
            NumberPredicate::Zero => |v| v == 0.0,
            NumberPredicate::Positive => |v| v > 0.0,
            NumberPredicate::Negative => |v| v < 0.0,
            NumberPredicate::NonNegative => |v| v >= 0.0,
        };
        Ok(Selection::from_fn(binder.rows(), |row| {
            NumberKind::cell(values, row).is_some_and(test)
        }))
    }

    pub(crate) fn operand_column(&self) -> Option<&AnyColumnRef> {
        match self {
            NumberPredicate::Ordered(test) => test.operand_column(),
            _ => None,
        }
    }
}

impl fmt::Display for NumberPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberPredicate::Ordered(test) => test.fmt(f),
            NumberPredicate::CloseTo { target, margin } => {
                write!(f, "close to {target} within {margin}")
            }
            NumberPredicate::Zero => f.write_str("is zero"),
            NumberPredicate::Positive => f.write_str("is positive"),
            NumberPredicate::Negative => f.write_str("is negative"),
            NumberPredicate::NonNegative => f.write_str("is non-negative"),
        }
    }
}

impl ColumnRef<NumberKind> {
    fn number(&self, predicate: NumberPredicate) -> Filter {
        self.leaf(LeafPredicate::Number(predicate))
    }

    fn compare(&self, op: ComparisonOp, operand: Operand<f64>) -> Filter {
        self.number(NumberPredicate::Ordered(OrderedTest::Compare { op, operand }))
    }

    /// `column == value`; `value` may be another number column.
    #[must_use]
    pub fn is_equal_to(&self, value: impl Into<Operand<f64>>) -> Filter {
        self.compare(ComparisonOp::Equal, value.into())
    }

    /// `column != value`; missing cells still never match.
    #[must_use]
    pub fn is_not_equal_to(&self, value: impl Into<Operand<f64>>) -> Filter {
        self.compare(ComparisonOp::NotEqual, value.into())
    }

    /// `column > value`.
    #[must_use]
    pub fn is_greater_than(&self, value: impl Into<Operand<f64>>) -> Filter {
        self.compare(ComparisonOp::GreaterThan, value.into())
    }

    /// `column >= value`.
    #[must_use]
    pub fn is_greater_than_or_equal_to(&self, value: impl Into<Operand<f64>>) -> Filter {
        self.compare(ComparisonOp::GreaterThanOrEqual, value.into())
    }

    /// `column < value`.
    #[must_use]
    pub fn is_less_than(&self, value: impl Into<Operand<f64>>) -> Filter {
        self.compare(ComparisonOp::LessThan, value.into())
    }

    /// `column <= value`.
    #[must_use]
    pub fn is_less_than_or_equal_to(&self, value: impl Into<Operand<f64>>) -> Filter {
        self.compare(ComparisonOp::LessThanOrEqual, value.into())
    }

    /// `low <= column <= high`.
    #[must_use]
    pub fn is_between_inclusive(&self, low: f64, high: f64) -> Filter {
        self.number(NumberPredicate::Ordered(OrderedTest::Between {
            low,
            high,
            inclusive: true,
        }))
    }

    /// `low < column < high`.
    #[must_use]
    pub fn is_between_exclusive(&self, low: f64, high: f64) -> Filter {
        self.number(NumberPredicate::Ordered(OrderedTest::Between {
            low,
            high,
            inclusive: false,
        }))
    }

    /// Matches values equal to one of `values`.
    #[must_use]
    pub fn is_in<I>(&self, values: I) -> Filter
    where
        I: IntoIterator<Item = f64>,
    {
        self.number(NumberPredicate::Ordered(OrderedTest::In {
            values: values.into_iter().collect(),
            negated: false,
        }))
    }

    /// Matches present values equal to none of `values`.
    #[must_use]
    pub fn is_not_in<I>(&self, values: I) -> Filter
    where
        I: IntoIterator<Item = f64>,
    {
        self.number(NumberPredicate::Ordered(OrderedTest::In {
            values: values.into_iter().collect(),
            negated: true,
        }))
    }

    /// Matches values within `margin` of `target`, bounds included.
    #[must_use]
    pub fn is_close_to(&self, target: f64, margin: f64) -> Filter {
        self.number(NumberPredicate::CloseTo {
            target,
            margin: margin.abs(),
        })
    }

    /// `column == 0`.
    #[must_use]
    pub fn is_zero(&self) -> Filter {
        self.number(NumberPredicate::Zero)
    }

    /// `column > 0`.
    #[must_use]
    pub fn is_positive(&self) -> Filter {
        self.number(NumberPredicate::Positive)
    }

    /// `column < 0`.
    #[must_use]
    pub fn is_negative(&self) -> Filter {
        self.number(NumberPredicate::Negative)
    }

    /// `column >= 0`.
    #[must_use]
    pub fn is_non_negative(&self) -> Filter {
        self.number(NumberPredicate::NonNegative)
    }
}

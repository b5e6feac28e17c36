//! Filters built from runtime-typed column references and scalar literals.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{
    AnyColumnRef, BooleanPredicate, ColumnType, ComparisonOp, NumberPredicate, Operand,
    OrderedTest, StringPredicate, TemporalPredicate,
};
use crate::{
    error::FilterError,
    filter::{Filter, LeafFilter, LeafPredicate},
    scalar::ScalarValue,
};

impl AnyColumnRef {
    /// Builds `column <op> value`, checking `value` against the column's tag.
    ///
    /// Number columns accept integer and float literals. Boolean columns only
    /// support `=` and `!=`.
    pub fn compare(
        &self,
        op: ComparisonOp,
        value: impl Into<ScalarValue>,
    ) -> Result<Filter, FilterError> {
        let value = value.into();
        let predicate = match self.column_type() {
            ColumnType::String => {
                let operand = Operand::Literal(self.string_operand(value)?);
                LeafPredicate::String(StringPredicate::Compare { op, operand })
            }
            ColumnType::Number => {
                let operand = Operand::Literal(self.number_operand(value)?);
                LeafPredicate::Number(NumberPredicate::Ordered(OrderedTest::Compare {
                    op,
                    operand,
                }))
            }
            ColumnType::Date => {
                let operand = Operand::Literal(self.date_operand(value)?);
                LeafPredicate::Date(ordered(op, operand))
            }
            ColumnType::DateTime => {
                let operand = Operand::Literal(self.date_time_operand(value)?);
                LeafPredicate::DateTime(ordered(op, operand))
            }
            ColumnType::Time => {
                let operand = Operand::Literal(self.time_operand(value)?);
                LeafPredicate::Time(ordered(op, operand))
            }
            ColumnType::Boolean => {
                let flag = self.boolean_operand(value)?;
                let expected = match op {
                    ComparisonOp::Equal => flag,
                    ComparisonOp::NotEqual => !flag,
                    _ => {
                        return Err(FilterError::UnsupportedOperator {
                            column: self.name().to_string(),
                            column_type: ColumnType::Boolean,
                            op: op.as_str(),
                        })
                    }
                };
                LeafPredicate::Boolean(BooleanPredicate::Equals(expected))
            }
        };
        Ok(self.dynamic_leaf(predicate))
    }

    /// Builds a membership filter; an empty list matches no row.
    pub fn is_in<I>(&self, values: I) -> Result<Filter, FilterError>
    where
        I: IntoIterator<Item = ScalarValue>,
    {
        let values = values.into_iter();
        let predicate = match self.column_type() {
            ColumnType::String => LeafPredicate::String(StringPredicate::In {
                values: values
                    .map(|value| self.string_operand(value))
                    .collect::<Result<_, _>>()?,
                negated: false,
            }),
            ColumnType::Number => {
                LeafPredicate::Number(NumberPredicate::Ordered(OrderedTest::In {
                    values: values
                        .map(|value| self.number_operand(value))
                        .collect::<Result<_, _>>()?,
                    negated: false,
                }))
            }
            ColumnType::Date => LeafPredicate::Date(member(
                values.map(|value| self.date_operand(value)),
            )?),
            ColumnType::DateTime => LeafPredicate::DateTime(member(
                values.map(|value| self.date_time_operand(value)),
            )?),
            ColumnType::Time => LeafPredicate::Time(member(
                values.map(|value| self.time_operand(value)),
            )?),
            ColumnType::Boolean => LeafPredicate::Boolean(BooleanPredicate::In(
                values
                    .map(|value| self.boolean_operand(value))
                    .collect::<Result<_, _>>()?,
            )),
        };
        Ok(self.dynamic_leaf(predicate))
    }

    fn dynamic_leaf(&self, predicate: LeafPredicate) -> Filter {
        Filter::leaf(LeafFilter::new(self.clone(), predicate))
    }

    fn operand_error(&self, value: &ScalarValue) -> FilterError {
        FilterError::OperandType {
            column: self.name().to_string(),
            expected: self.column_type(),
            operand: value.type_name(),
        }
    }

    fn string_operand(&self, value: ScalarValue) -> Result<String, FilterError> {
        match value {
            ScalarValue::Utf8(value) => Ok(value),
            other => Err(self.operand_error(&other)),
        }
    }

    fn number_operand(&self, value: ScalarValue) -> Result<f64, FilterError> {
        match value {
            ScalarValue::Int64(value) => Ok(value as f64),
            ScalarValue::Float64(value) => Ok(value),
            other => Err(self.operand_error(&other)),
        }
    }

    fn date_operand(&self, value: ScalarValue) -> Result<NaiveDate, FilterError> {
        match value {
            ScalarValue::Date(value) => Ok(value),
            other => Err(self.operand_error(&other)),
        }
    }

    fn date_time_operand(&self, value: ScalarValue) -> Result<NaiveDateTime, FilterError> {
        match value {
            ScalarValue::DateTime(value) => Ok(value),
            other => Err(self.operand_error(&other)),
        }
    }

    fn time_operand(&self, value: ScalarValue) -> Result<NaiveTime, FilterError> {
        match value {
            ScalarValue::Time(value) => Ok(value),
            other => Err(self.operand_error(&other)),
        }
    }

    fn boolean_operand(&self, value: ScalarValue) -> Result<bool, FilterError> {
        match value {
            ScalarValue::Boolean(value) => Ok(value),
            other => Err(self.operand_error(&other)),
        }
    }
}

fn ordered<V>(op: ComparisonOp, operand: Operand<V>) -> TemporalPredicate<V> {
    TemporalPredicate::Ordered(OrderedTest::Compare { op, operand })
}

fn member<V, I>(values: I) -> Result<TemporalPredicate<V>, FilterError>
where
    I: Iterator<Item = Result<V, FilterError>>,
{
    Ok(TemporalPredicate::Ordered(OrderedTest::In {
        values: values.collect::<Result<_, _>>()?,
        negated: false,
    }))
}

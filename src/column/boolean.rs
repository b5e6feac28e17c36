use std::fmt;

use arrow::array::{Array, ArrayRef, AsArray};

use super::{AnyColumnRef, BooleanKind, ColumnRef, ColumnType};
use crate::{
    error::FilterError,
    filter::{Filter, LeafPredicate},
    selection::Selection,
    table::Binder,
};

/// Predicates over boolean columns.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BooleanPredicate {
    /// Present value equal to the given flag.
    Equals(bool),
    /// Present value equal to one of the given flags.
    In(Vec<bool>),
}

impl BooleanPredicate {
    pub(crate) fn select(
        &self,
        column: &AnyColumnRef,
        array: &ArrayRef,
        binder: &Binder<'_>,
    ) -> Result<Selection, FilterError> {
        let values = array
            .as_boolean_opt()
            .ok_or_else(|| FilterError::TypeMismatch {
                column: column.name().to_string(),
                expected: ColumnType::Boolean,
                actual: array.data_type().clone(),
            })?;
        let (accept_true, accept_false) = match self {
            BooleanPredicate::Equals(flag) => (*flag, !*flag),
            BooleanPredicate::In(flags) => (flags.contains(&true), flags.contains(&false)),
        };
        Ok(Selection::from_fn(binder.rows(), |row| {
            !values.is_null(row) && if values.value(row) { accept_true } else { accept_false }
        }))
    }
}

impl fmt::Display for BooleanPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanPredicate::Equals(true) => f.write_str("is true"),
            BooleanPredicate::Equals(false) => f.write_str("is false"),
            BooleanPredicate::In(flags) => {
                f.write_str("in (")?;
                for (i, flag) in flags.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{flag}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl ColumnRef<BooleanKind> {
    /// Matches rows holding `true`.
    #[must_use]
    pub fn is_true(&self) -> Filter {
        self.is_equal_to(true)
    }

    /// Matches rows holding `false`; missing cells do not match.
    #[must_use]
    pub fn is_false(&self) -> Filter {
        self.is_equal_to(false)
    }

    /// Matches rows holding `value`.
    #[must_use]
    pub fn is_equal_to(&self, value: bool) -> Filter {
        self.leaf(LeafPredicate::Boolean(BooleanPredicate::Equals(value)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::BooleanArray,
        datatypes::{DataType, Field, Schema},
        record_batch::RecordBatch,
    };

    use crate::column::{BooleanKind, ColumnRef};

    #[test]
    fn flags_and_missing_cells() {
        let schema = Arc::new(Schema::new(vec![Field::new("b", DataType::Boolean, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(BooleanArray::from(vec![
                Some(true),
                None,
                Some(false),
                Some(true),
            ]))],
        )
        .expect("record batch");

        let b = ColumnRef::<BooleanKind>::new("b");
        let eval = |filter: crate::Filter| filter.evaluate(&batch).expect("evaluate").to_vec();
        assert_eq!(eval(b.is_true()), vec![0, 3]);
        assert_eq!(eval(b.is_false()), vec![2]);
        assert_eq!(eval(b.is_missing()), vec![1]);
        assert_eq!(eval(!b.is_true()), vec![1, 2]);
    }
}

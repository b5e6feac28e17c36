use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{AnyColumnRef, ColumnKind, ColumnRef};

/// Right-hand side of a comparison: a literal or another column of the same kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand<V> {
    /// Literal value.
    Literal(V),
    /// Column compared row by row; bound at evaluation like the left-hand side.
    Column(AnyColumnRef),
}

impl<V> Operand<V> {
    /// Returns the referenced column when the operand is not a literal.
    #[must_use]
    pub fn column(&self) -> Option<&AnyColumnRef> {
        match self {
            Operand::Column(column) => Some(column),
            Operand::Literal(_) => None,
        }
    }
}

impl<V: fmt::Display> fmt::Display for Operand<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => value.fmt(f),
            Operand::Column(column) => write!(f, "[{column}]"),
        }
    }
}

impl<K: ColumnKind> From<ColumnRef<K>> for Operand<K::Value> {
    fn from(value: ColumnRef<K>) -> Self {
        Self::Column(value.into())
    }
}

impl<K: ColumnKind> From<&ColumnRef<K>> for Operand<K::Value> {
    fn from(value: &ColumnRef<K>) -> Self {
        Self::Column(value.erase())
    }
}

macro_rules! literal_operand {
    ($target:ty => $($source:ty),+) => {
        $(
            impl From<$source> for Operand<$target> {
                fn from(value: $source) -> Self {
                    Self::Literal(<$target>::from(value))
                }
            }
        )+
    };
}

literal_operand!(f64 => f64, f32, i32, u32, i16, u16, i8, u8);
literal_operand!(String => String, &str);
literal_operand!(NaiveDate => NaiveDate);
literal_operand!(NaiveDateTime => NaiveDateTime);
literal_operand!(NaiveTime => NaiveTime);
literal_operand!(bool => bool);

impl From<i64> for Operand<f64> {
    fn from(value: i64) -> Self {
        Self::Literal(value as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::Operand;
    use crate::column::{ColumnRef, ColumnType, NumberKind};

    #[test]
    fn literals_and_columns_convert() {
        assert_eq!(Operand::<f64>::from(3), Operand::Literal(3.0));
        assert_eq!(Operand::<f64>::from(7i64), Operand::Literal(7.0));
        assert_eq!(Operand::<String>::from("x"), Operand::Literal("x".to_string()));

        let other = ColumnRef::<NumberKind>::new("limit");
        let operand = Operand::<f64>::from(&other);
        let column = operand.column().expect("column operand");
        assert_eq!(column.name(), "limit");
        assert_eq!(column.column_type(), ColumnType::Number);
        assert_eq!(operand.to_string(), "[limit]");
    }
}

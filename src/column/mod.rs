//! Typed, table-independent column references and their comparison operators.
//!
//! A [`ColumnRef`] only names a column. Operator methods are defined per column
//! kind, so asking a number column whether it `starts_with` something is a
//! compile error rather than a runtime surprise:
//!
//! ```compile_fail,E0599
//! use colfilter::number_column;
//!
//! let _ = number_column("age").starts_with("1");
//! ```
//!
//! ```compile_fail,E0599
//! use colfilter::string_column;
//!
//! let _ = string_column("name").is_greater_than(3.0);
//! ```
//!
//! Binding to real data happens inside [`Filter::evaluate`](crate::Filter::evaluate).

mod boolean;
mod dynamic;
mod number;
mod operand;
mod ordered;
mod string;
mod temporal;

use std::{fmt, hash::Hash, sync::Arc};

use arrow::datatypes::{DataType, TimeUnit};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub use boolean::BooleanPredicate;
pub use number::NumberPredicate;
pub use operand::Operand;
pub use ordered::{ComparisonOp, OrderedTest};
pub(crate) use ordered::{downcast_primitive, PrimitiveKind};
pub use string::{Pattern, StringPredicate};
pub use temporal::{CalendarTest, ClockTest, Quarter, TemporalPredicate};

use crate::filter::{Filter, LeafFilter, LeafPredicate};

/// Runtime type tag of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// UTF-8 text.
    String,
    /// Any integer, floating point or decimal column, read as `f64`.
    Number,
    /// Calendar date without time of day.
    Date,
    /// Timestamp, read as UTC wall-clock time.
    DateTime,
    /// Time of day.
    Time,
    /// Boolean.
    Boolean,
}

impl ColumnType {
    /// Maps an Arrow type onto its tag; unsupported types yield `None`.
    #[must_use]
    pub fn of(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Utf8 | DataType::LargeUtf8 => Some(ColumnType::String),
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _) => Some(ColumnType::Number),
            DataType::Date32 | DataType::Date64 => Some(ColumnType::Date),
            DataType::Timestamp(_, _) => Some(ColumnType::DateTime),
            DataType::Time32(_) | DataType::Time64(_) => Some(ColumnType::Time),
            DataType::Boolean => Some(ColumnType::Boolean),
            _ => None,
        }
    }

    /// Layout every column of this tag is normalized to before it is scanned.
    pub(crate) fn canonical(self, actual: &DataType) -> DataType {
        match self {
            ColumnType::String => DataType::Utf8,
            ColumnType::Number => DataType::Float64,
            ColumnType::Date => DataType::Date32,
            ColumnType::DateTime => match actual {
                DataType::Timestamp(_, tz) => DataType::Timestamp(TimeUnit::Microsecond, tz.clone()),
                _ => DataType::Timestamp(TimeUnit::Microsecond, None),
            },
            ColumnType::Time => DataType::Time64(TimeUnit::Nanosecond),
            ColumnType::Boolean => DataType::Boolean,
        }
    }

    /// Lower-case name used in messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Time => "time",
            ColumnType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod private {
    pub trait Sealed {}
}

/// Compile-time marker for the kind of column a [`ColumnRef`] points at.
///
/// The trait is sealed; the six kinds below are the complete set.
pub trait ColumnKind:
    private::Sealed + Copy + Default + fmt::Debug + PartialEq + Eq + Hash + Send + Sync + 'static
{
    /// Literal type accepted by the kind's operators.
    type Value: Clone + fmt::Debug + fmt::Display + PartialEq + PartialOrd + Send + Sync + 'static;

    /// Runtime tag the bound column must carry.
    const TYPE: ColumnType;
}

macro_rules! column_kind {
    ($(#[$meta:meta])* $kind:ident, $value:ty, $tag:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $kind;

        impl private::Sealed for $kind {}

        impl ColumnKind for $kind {
            type Value = $value;
            const TYPE: ColumnType = $tag;
        }
    };
}

column_kind!(
    /// Text columns.
    StringKind,
    String,
    ColumnType::String
);
column_kind!(
    /// Numeric columns.
    NumberKind,
    f64,
    ColumnType::Number
);
column_kind!(
    /// Date columns.
    DateKind,
    NaiveDate,
    ColumnType::Date
);
column_kind!(
    /// Timestamp columns.
    DateTimeKind,
    NaiveDateTime,
    ColumnType::DateTime
);
column_kind!(
    /// Time-of-day columns.
    TimeKind,
    NaiveTime,
    ColumnType::Time
);
column_kind!(
    /// Boolean columns.
    BooleanKind,
    bool,
    ColumnType::Boolean
);

/// Unbound reference to a column of kind `K`.
///
/// It carries only the column name; it is resolved against a table each time a
/// filter built from it is evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnRef<K: ColumnKind> {
    name: Arc<str>,
    kind: K,
}

impl<K: ColumnKind> ColumnRef<K> {
    /// Creates a reference to the column called `name`.
    #[must_use]
    pub fn new<N>(name: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self {
            name: name.into(),
            kind: K::default(),
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type tag the bound column must carry.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        K::TYPE
    }

    /// Drops the compile-time kind, keeping name and tag.
    #[must_use]
    pub fn erase(&self) -> AnyColumnRef {
        AnyColumnRef {
            name: Arc::clone(&self.name),
            column_type: K::TYPE,
        }
    }

    /// Matches rows whose cell is missing.
    #[must_use]
    pub fn is_missing(&self) -> Filter {
        self.leaf(LeafPredicate::Missing { negated: false })
    }

    /// Matches rows whose cell is present.
    #[must_use]
    pub fn is_not_missing(&self) -> Filter {
        self.leaf(LeafPredicate::Missing { negated: true })
    }

    pub(crate) fn leaf(&self, predicate: LeafPredicate) -> Filter {
        Filter::leaf(LeafFilter::new(self.erase(), predicate))
    }
}

impl<K: ColumnKind> From<ColumnRef<K>> for AnyColumnRef {
    fn from(value: ColumnRef<K>) -> Self {
        AnyColumnRef {
            name: value.name,
            column_type: K::TYPE,
        }
    }
}

impl<K: ColumnKind> fmt::Display for ColumnRef<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Column reference whose kind is only known at runtime.
///
/// Two references are equal iff both name and type tag match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnyColumnRef {
    name: Arc<str>,
    column_type: ColumnType,
}

impl AnyColumnRef {
    /// Creates a reference to `name`, expected to hold `column_type` values.
    #[must_use]
    pub fn new<N>(name: N, column_type: ColumnType) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self {
            name: name.into(),
            column_type,
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type tag the bound column must carry.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Matches rows whose cell is missing.
    #[must_use]
    pub fn is_missing(&self) -> Filter {
        Filter::leaf(LeafFilter::new(
            self.clone(),
            LeafPredicate::Missing { negated: false },
        ))
    }

    /// Matches rows whose cell is present.
    #[must_use]
    pub fn is_not_missing(&self) -> Filter {
        Filter::leaf(LeafFilter::new(
            self.clone(),
            LeafPredicate::Missing { negated: true },
        ))
    }
}

impl fmt::Display for AnyColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

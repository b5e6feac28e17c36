//! Free-function helpers for building column references and filter trees.
//!
//! ```
//! use colfilter::query::{both, not, number_column, string_column};
//!
//! let adult = number_column("age").is_greater_than_or_equal_to(18.0);
//! let filter = both(adult, not(string_column("name").is_empty_string()));
//! assert_eq!(filter.depth(), 3);
//! ```

use crate::{
    column::{BooleanKind, ColumnRef, DateKind, DateTimeKind, NumberKind, StringKind, TimeKind},
    error::FilterError,
    filter::Filter,
};

/// Reference to a string column.
#[must_use]
pub fn string_column(name: &str) -> ColumnRef<StringKind> {
    ColumnRef::new(name)
}

/// Reference to a number column.
#[must_use]
pub fn number_column(name: &str) -> ColumnRef<NumberKind> {
    ColumnRef::new(name)
}

/// Reference to a date column.
#[must_use]
pub fn date_column(name: &str) -> ColumnRef<DateKind> {
    ColumnRef::new(name)
}

/// Reference to a timestamp column.
#[must_use]
pub fn date_time_column(name: &str) -> ColumnRef<DateTimeKind> {
    ColumnRef::new(name)
}

/// Reference to a time-of-day column.
#[must_use]
pub fn time_column(name: &str) -> ColumnRef<TimeKind> {
    ColumnRef::new(name)
}

/// Reference to a boolean column.
#[must_use]
pub fn boolean_column(name: &str) -> ColumnRef<BooleanKind> {
    ColumnRef::new(name)
}

/// Rows matching both filters.
#[must_use]
pub fn both(left: Filter, right: Filter) -> Filter {
    Filter::both(left, right)
}

/// Rows matching every filter.
///
/// # Errors
///
/// [`FilterError::InvalidFilter`] when `filters` is empty.
pub fn all_of<I>(filters: I) -> Result<Filter, FilterError>
where
    I: IntoIterator<Item = Filter>,
{
    Filter::all_of(filters)
}

/// Alias of [`all_of`].
///
/// # Errors
///
/// [`FilterError::InvalidFilter`] when `filters` is empty.
pub fn and<I>(filters: I) -> Result<Filter, FilterError>
where
    I: IntoIterator<Item = Filter>,
{
    Filter::all_of(filters)
}

/// Rows matching either filter.
#[must_use]
pub fn either(left: Filter, right: Filter) -> Filter {
    Filter::either(left, right)
}

/// Rows matching at least one filter.
///
/// # Errors
///
/// [`FilterError::InvalidFilter`] when `filters` is empty.
pub fn any_of<I>(filters: I) -> Result<Filter, FilterError>
where
    I: IntoIterator<Item = Filter>,
{
    Filter::any_of(filters)
}

/// Alias of [`any_of`].
///
/// # Errors
///
/// [`FilterError::InvalidFilter`] when `filters` is empty.
pub fn or<I>(filters: I) -> Result<Filter, FilterError>
where
    I: IntoIterator<Item = Filter>,
{
    Filter::any_of(filters)
}

/// Rows the filter does not match, rows with missing cells included.
#[must_use]
pub fn not(filter: Filter) -> Filter {
    filter.negate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;

    #[test]
    fn constructors_carry_type_tags() {
        assert_eq!(string_column("s").column_type(), ColumnType::String);
        assert_eq!(number_column("n").column_type(), ColumnType::Number);
        assert_eq!(date_column("d").column_type(), ColumnType::Date);
        assert_eq!(date_time_column("dt").column_type(), ColumnType::DateTime);
        assert_eq!(time_column("t").column_type(), ColumnType::Time);
        assert_eq!(boolean_column("b").column_type(), ColumnType::Boolean);
        assert_eq!(number_column("n").name(), "n");
    }

    #[test]
    fn variadic_forms_build_the_same_nodes() {
        let a = number_column("n").is_zero();
        let b = boolean_column("b").is_true();
        let pair = [a.clone(), b.clone()];
        assert_eq!(and(pair.clone()).expect("and"), both(a.clone(), b.clone()));
        assert_eq!(all_of(pair.clone()).expect("all_of"), both(a.clone(), b.clone()));
        assert_eq!(or(pair.clone()).expect("or"), either(a.clone(), b.clone()));
        assert_eq!(any_of(pair).expect("any_of"), either(a.clone(), b));
        assert_eq!(not(a.clone()), !a);
        assert!(and(Vec::new()).is_err());
        assert!(or(Vec::new()).is_err());
    }
}

use std::{collections::HashSet, fmt};

use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use regex::Regex;

use super::{AnyColumnRef, ColumnRef, ComparisonOp, Operand, StringKind};
use crate::{
    error::FilterError,
    filter::{Filter, LeafPredicate},
    selection::Selection,
    table::Binder,
};

/// Compiled regular expression operand.
#[derive(Clone, Debug)]
pub struct Pattern(Regex);

impl Pattern {
    /// Source text of the expression.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// Predicates over string columns.
#[derive(Clone, Debug, PartialEq)]
pub enum StringPredicate {
    /// `column <op> operand`, ordered by code point.
    Compare {
        /// Operator.
        op: ComparisonOp,
        /// Literal or column on the right-hand side.
        operand: Operand<String>,
    },
    /// Case-insensitive equality.
    EqualsIgnoreCase(String),
    /// Membership in a literal list.
    In {
        /// Candidate values.
        values: Vec<String>,
        /// True when representing `NOT IN`.
        negated: bool,
    },
    /// Value starts with the given prefix.
    StartsWith(String),
    /// Value ends with the given suffix.
    EndsWith(String),
    /// Value contains the given substring.
    Contains(String),
    /// Value contains a match of the pattern.
    Matches(Pattern),
    /// Value is the empty string.
    Empty,
    /// Non-empty and alphabetic only.
    Alpha,
    /// Non-empty and numeric only.
    Numeric,
    /// Non-empty and alphanumeric only.
    AlphaNumeric,
    /// Has a cased character and no lower-case one.
    UpperCase,
    /// Has a cased character and no upper-case one.
    LowerCase,
    /// Length in characters compared with `len`.
    Length {
        /// Operator.
        op: ComparisonOp,
        /// Character count.
        len: usize,
    },
}

impl StringPredicate {
    pub(crate) fn select(
        &self,
        column: &AnyColumnRef,
        array: &ArrayRef,
        binder: &Binder<'_>,
    ) -> Result<Selection, FilterError> {
        let values = downcast_string(column, array)?;
        let rows = binder.rows();
        let cell = |row: usize| (!values.is_null(row)).then(|| values.value(row));

        let selection = match self {
            StringPredicate::Compare {
                op,
                operand: Operand::Literal(rhs),
            } => Selection::from_fn(rows, |row| {
                cell(row).is_some_and(|lhs| op.test_ordering(lhs.cmp(rhs.as_str())))
            }),
            StringPredicate::Compare {
                op,
                operand: Operand::Column(other),
            } => {
                let bound = binder.bind(other)?;
                let others = downcast_string(other, &bound)?;
                Selection::from_fn(rows, |row| {
                    if values.is_null(row) || others.is_null(row) {
                        return false;
                    }
                    op.test_ordering(values.value(row).cmp(others.value(row)))
                })
            }
            StringPredicate::EqualsIgnoreCase(expected) => {
                let expected = expected.to_lowercase();
                Selection::from_fn(rows, |row| {
                    cell(row).is_some_and(|value| value.to_lowercase() == expected)
                })
            }
            StringPredicate::In {
                values: list,
                negated,
            } => {
                let set: HashSet<&str> = list.iter().map(String::as_str).collect();
                Selection::from_fn(rows, |row| {
                    cell(row).is_some_and(|value| set.contains(value) != *negated)
                })
            }
            StringPredicate::StartsWith(prefix) => Selection::from_fn(rows, |row| {
                cell(row).is_some_and(|value| value.starts_with(prefix.as_str()))
            }),
            StringPredicate::EndsWith(suffix) => Selection::from_fn(rows, |row| {
                cell(row).is_some_and(|value| value.ends_with(suffix.as_str()))
            }),
            StringPredicate::Contains(needle) => Selection::from_fn(rows, |row| {
                cell(row).is_some_and(|value| value.contains(needle.as_str()))
            }),
            StringPredicate::Matches(pattern) => Selection::from_fn(rows, |row| {
                cell(row).is_some_and(|value| pattern.0.is_match(value))
            }),
            StringPredicate::Length { op, len } => Selection::from_fn(rows, |row| {
                cell(row).is_some_and(|value| op.test_ordering(value.chars().count().cmp(len)))
            }),
            StringPredicate::Empty => {
                Selection::from_fn(rows, |row| cell(row).is_some_and(str::is_empty))
            }
            StringPredicate::Alpha => Selection::from_fn(rows, |row| {
                cell(row).is_some_and(|value| all_chars(value, char::is_alphabetic))
            }),
            StringPredicate::Numeric => Selection::from_fn(rows, |row| {
                cell(row).is_some_and(|value| all_chars(value, char::is_numeric))
            }),
            StringPredicate::AlphaNumeric => Selection::from_fn(rows, |row| {
                cell(row).is_some_and(|value| all_chars(value, char::is_alphanumeric))
            }),
            StringPredicate::UpperCase => Selection::from_fn(rows, |row| {
                cell(row).is_some_and(|value| single_case(value, char::is_uppercase))
            }),
            StringPredicate::LowerCase => Selection::from_fn(rows, |row| {
                cell(row).is_some_and(|value| single_case(value, char::is_lowercase))
            }),
        };
        Ok(selection)
    }

    pub(crate) fn operand_column(&self) -> Option<&AnyColumnRef> {
        match self {
            StringPredicate::Compare { operand, .. } => operand.column(),
            _ => None,
        }
    }
}

fn all_chars(value: &str, test: fn(char) -> bool) -> bool {
    !value.is_empty() && value.chars().all(test)
}

// Upper-case means every cased character is upper-case and at least one exists.
fn single_case(value: &str, wanted: fn(char) -> bool) -> bool {
    let mut cased = value.chars().filter(|c| c.is_uppercase() || c.is_lowercase());
    let mut seen = false;
    cased.all(|c| {
        seen = true;
        wanted(c)
    }) && seen
}

fn downcast_string<'a>(
    column: &AnyColumnRef,
    array: &'a ArrayRef,
) -> Result<&'a StringArray, FilterError> {
    array
        .as_string_opt::<i32>()
        .ok_or_else(|| FilterError::TypeMismatch {
            column: column.name().to_string(),
            expected: super::ColumnType::String,
            actual: array.data_type().clone(),
        })
}

impl fmt::Display for StringPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringPredicate::Compare {
                op,
                operand: Operand::Literal(value),
            } => write!(f, "{op} {value:?}"),
            StringPredicate::Compare { op, operand } => write!(f, "{op} {operand}"),
            StringPredicate::EqualsIgnoreCase(value) => write!(f, "equals ignoring case {value:?}"),
            StringPredicate::In { values, negated } => {
                let keyword = if *negated { "not in" } else { "in" };
                write!(f, "{keyword} {values:?}")
            }
            StringPredicate::StartsWith(value) => write!(f, "starts with {value:?}"),
            StringPredicate::EndsWith(value) => write!(f, "ends with {value:?}"),
            StringPredicate::Contains(value) => write!(f, "contains {value:?}"),
            StringPredicate::Matches(pattern) => write!(f, "matches /{}/", pattern.as_str()),
            StringPredicate::Empty => f.write_str("is empty"),
            StringPredicate::Alpha => f.write_str("is alpha"),
            StringPredicate::Numeric => f.write_str("is numeric"),
            StringPredicate::AlphaNumeric => f.write_str("is alphanumeric"),
            StringPredicate::UpperCase => f.write_str("is upper case"),
            StringPredicate::LowerCase => f.write_str("is lower case"),
            StringPredicate::Length { op, len } => write!(f, "length {op} {len}"),
        }
    }
}

impl ColumnRef<StringKind> {
    fn string(&self, predicate: StringPredicate) -> Filter {
        self.leaf(LeafPredicate::String(predicate))
    }

    /// `column == value`; `value` may be another string column.
    #[must_use]
    pub fn is_equal_to(&self, value: impl Into<Operand<String>>) -> Filter {
        self.string(StringPredicate::Compare {
            op: ComparisonOp::Equal,
            operand: value.into(),
        })
    }

    /// `column != value`; missing cells still never match.
    #[must_use]
    pub fn is_not_equal_to(&self, value: impl Into<Operand<String>>) -> Filter {
        self.string(StringPredicate::Compare {
            op: ComparisonOp::NotEqual,
            operand: value.into(),
        })
    }

    /// Equality after lower-casing both sides.
    #[must_use]
    pub fn is_equal_to_ignoring_case(&self, value: impl Into<String>) -> Filter {
        self.string(StringPredicate::EqualsIgnoreCase(value.into()))
    }

    /// Matches values equal to one of `values`.
    #[must_use]
    pub fn is_in<I, S>(&self, values: I) -> Filter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.string(StringPredicate::In {
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        })
    }

    /// Matches present values equal to none of `values`.
    #[must_use]
    pub fn is_not_in<I, S>(&self, values: I) -> Filter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.string(StringPredicate::In {
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        })
    }

    /// Value starts with `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: impl Into<String>) -> Filter {
        self.string(StringPredicate::StartsWith(prefix.into()))
    }

    /// Value ends with `suffix`.
    #[must_use]
    pub fn ends_with(&self, suffix: impl Into<String>) -> Filter {
        self.string(StringPredicate::EndsWith(suffix.into()))
    }

    /// Value contains `needle`.
    #[must_use]
    pub fn contains_string(&self, needle: impl Into<String>) -> Filter {
        self.string(StringPredicate::Contains(needle.into()))
    }

    /// Value contains a match of `pattern`.
    ///
    /// The pattern is compiled here, so a malformed expression fails before
    /// any table is involved.
    pub fn matches_regex(&self, pattern: &str) -> Result<Filter, FilterError> {
        let regex = Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self.string(StringPredicate::Matches(Pattern(regex))))
    }

    /// Value is `""`.
    #[must_use]
    pub fn is_empty_string(&self) -> Filter {
        self.string(StringPredicate::Empty)
    }

    /// Non-empty and made of alphabetic characters only.
    #[must_use]
    pub fn is_alpha(&self) -> Filter {
        self.string(StringPredicate::Alpha)
    }

    /// Non-empty and made of numeric characters only.
    #[must_use]
    pub fn is_numeric(&self) -> Filter {
        self.string(StringPredicate::Numeric)
    }

    /// Non-empty and made of alphanumeric characters only.
    #[must_use]
    pub fn is_alpha_numeric(&self) -> Filter {
        self.string(StringPredicate::AlphaNumeric)
    }

    /// Has at least one cased character and none in lower case.
    #[must_use]
    pub fn is_upper_case(&self) -> Filter {
        self.string(StringPredicate::UpperCase)
    }

    /// Has at least one cased character and none in upper case.
    #[must_use]
    pub fn is_lower_case(&self) -> Filter {
        self.string(StringPredicate::LowerCase)
    }

    /// Length in characters equals `len`.
    #[must_use]
    pub fn length_equals(&self, len: usize) -> Filter {
        self.string(StringPredicate::Length {
            op: ComparisonOp::Equal,
            len,
        })
    }

    /// Length in characters is below `len`.
    #[must_use]
    pub fn is_shorter_than(&self, len: usize) -> Filter {
        self.string(StringPredicate::Length {
            op: ComparisonOp::LessThan,
            len,
        })
    }

    /// Length in characters is above `len`.
    #[must_use]
    pub fn is_longer_than(&self, len: usize) -> Filter {
        self.string(StringPredicate::Length {
            op: ComparisonOp::GreaterThan,
            len,
        })
    }
}

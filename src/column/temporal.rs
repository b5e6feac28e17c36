use std::fmt;

use arrow::array::ArrayRef;
use chrono::{Datelike, Month, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

use super::{
    downcast_primitive, AnyColumnRef, ColumnRef, ComparisonOp, DateKind, DateTimeKind, Operand,
    OrderedTest, PrimitiveKind, TimeKind,
};
use crate::{
    error::FilterError,
    filter::{Filter, LeafPredicate},
    selection::Selection,
    table::Binder,
};

/// Quarter of the calendar year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quarter {
    /// January to March.
    Q1,
    /// April to June.
    Q2,
    /// July to September.
    Q3,
    /// October to December.
    Q4,
}

impl Quarter {
    /// Quarter containing `month` (1-based).
    fn of_month(month: u32) -> Self {
        match month {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }
}

/// Tests on the calendar date of a date or timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalendarTest {
    /// Date falls in the given year.
    Year(i32),
    /// Date falls in the given month of any year.
    Month(Month),
    /// Date falls in the given quarter of any year.
    Quarter(Quarter),
    /// Date is the given day of the week.
    DayOfWeek(Weekday),
    /// Saturday or Sunday.
    Weekend,
    /// Monday to Friday.
    WorkingDay,
    /// First day of its month.
    FirstDayOfMonth,
    /// Last day of its month.
    LastDayOfMonth,
}

impl CalendarTest {
    fn test(self, date: NaiveDate) -> bool {
        match self {
            CalendarTest::Year(year) => date.year() == year,
            CalendarTest::Month(month) => date.month() == month.number_from_month(),
            CalendarTest::Quarter(quarter) => Quarter::of_month(date.month()) == quarter,
            CalendarTest::DayOfWeek(day) => date.weekday() == day,
            CalendarTest::Weekend => matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            CalendarTest::WorkingDay => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            CalendarTest::FirstDayOfMonth => date.day() == 1,
            CalendarTest::LastDayOfMonth => date
                .succ_opt()
                .map_or(true, |next| next.month() != date.month()),
        }
    }
}

impl fmt::Display for CalendarTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarTest::Year(year) => write!(f, "in year {year}"),
            CalendarTest::Month(month) => write!(f, "in {}", month.name()),
            CalendarTest::Quarter(quarter) => write!(f, "in {quarter:?}"),
            CalendarTest::DayOfWeek(day) => write!(f, "on {day}"),
            CalendarTest::Weekend => f.write_str("on a weekend"),
            CalendarTest::WorkingDay => f.write_str("on a weekday"),
            CalendarTest::FirstDayOfMonth => f.write_str("first day of month"),
            CalendarTest::LastDayOfMonth => f.write_str("last day of month"),
        }
    }
}

/// Tests on the time of day of a time or timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClockTest {
    /// Exactly 00:00:00.
    Midnight,
    /// Exactly 12:00:00.
    Noon,
    /// Strictly before 12:00:00.
    BeforeNoon,
    /// Strictly after 12:00:00.
    AfterNoon,
}

impl ClockTest {
    fn test(self, time: NaiveTime) -> bool {
        let exact = time.minute() == 0 && time.second() == 0 && time.nanosecond() == 0;
        match self {
            ClockTest::Midnight => time.hour() == 0 && exact,
            ClockTest::Noon => time.hour() == 12 && exact,
            ClockTest::BeforeNoon => time.hour() < 12,
            ClockTest::AfterNoon => time.hour() >= 12 && !(time.hour() == 12 && exact),
        }
    }
}

impl fmt::Display for ClockTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClockTest::Midnight => "at midnight",
            ClockTest::Noon => "at noon",
            ClockTest::BeforeNoon => "before noon",
            ClockTest::AfterNoon => "after noon",
        })
    }
}

/// Splits a temporal value into the parts calendar and clock tests look at.
pub(crate) trait TemporalValue: PartialOrd {
    fn date_part(&self) -> Option<NaiveDate>;
    fn time_part(&self) -> Option<NaiveTime>;
}

impl TemporalValue for NaiveDate {
    fn date_part(&self) -> Option<NaiveDate> {
        Some(*self)
    }

    fn time_part(&self) -> Option<NaiveTime> {
        None
    }
}

impl TemporalValue for NaiveDateTime {
    fn date_part(&self) -> Option<NaiveDate> {
        Some(self.date())
    }

    fn time_part(&self) -> Option<NaiveTime> {
        Some(self.time())
    }
}

impl TemporalValue for NaiveTime {
    fn date_part(&self) -> Option<NaiveDate> {
        None
    }

    fn time_part(&self) -> Option<NaiveTime> {
        Some(*self)
    }
}

/// Predicates over date, timestamp and time columns.
#[derive(Clone, Debug, PartialEq)]
pub enum TemporalPredicate<V> {
    /// Comparison, range or membership test.
    Ordered(OrderedTest<V>),
    /// Calendar test on the date part.
    Calendar(CalendarTest),
    /// Clock test on the time-of-day part.
    Clock(ClockTest),
}

impl<V: TemporalValue> TemporalPredicate<V> {
    pub(crate) fn select<K>(
        &self,
        column: &AnyColumnRef,
        array: &ArrayRef,
        binder: &Binder<'_>,
    ) -> Result<Selection, FilterError>
    where
        K: PrimitiveKind<Value = V>,
    {
        let values = downcast_primitive::<K>(column, array)?;
        let rows = binder.rows();
        let selection = match self {
            TemporalPredicate::Ordered(test) => return test.select::<K>(values, binder),
            TemporalPredicate::Calendar(test) => Selection::from_fn(rows, |row| {
                K::cell(values, row)
                    .and_then(|value| value.date_part())
                    .is_some_and(|date| test.test(date))
            }),
            TemporalPredicate::Clock(test) => Selection::from_fn(rows, |row| {
                K::cell(values, row)
                    .and_then(|value| value.time_part())
                    .is_some_and(|time| test.test(time))
            }),
        };
        Ok(selection)
    }
}

impl<V> TemporalPredicate<V> {
    pub(crate) fn operand_column(&self) -> Option<&AnyColumnRef> {
        match self {
            TemporalPredicate::Ordered(OrderedTest::Compare { operand, .. }) => operand.column(),
            _ => None,
        }
    }
}

impl<V: fmt::Display> fmt::Display for TemporalPredicate<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalPredicate::Ordered(test) => test.fmt(f),
            TemporalPredicate::Calendar(test) => test.fmt(f),
            TemporalPredicate::Clock(test) => test.fmt(f),
        }
    }
}

// Ordering, range and membership operators shared by the temporal kinds.
macro_rules! temporal_ordering_ops {
    ($kind:ty, $value:ty, $variant:ident) => {
        impl ColumnRef<$kind> {
            fn temporal(&self, predicate: TemporalPredicate<$value>) -> Filter {
                self.leaf(LeafPredicate::$variant(predicate))
            }

            fn compare(&self, op: ComparisonOp, operand: Operand<$value>) -> Filter {
                self.temporal(TemporalPredicate::Ordered(OrderedTest::Compare { op, operand }))
            }

            /// `column == value`; `value` may be another column of the same kind.
            #[must_use]
            pub fn is_equal_to(&self, value: impl Into<Operand<$value>>) -> Filter {
                self.compare(ComparisonOp::Equal, value.into())
            }

            /// `column != value`; missing cells still never match.
            #[must_use]
            pub fn is_not_equal_to(&self, value: impl Into<Operand<$value>>) -> Filter {
                self.compare(ComparisonOp::NotEqual, value.into())
            }

            /// Strictly earlier than `value`.
            #[must_use]
            pub fn is_before(&self, value: impl Into<Operand<$value>>) -> Filter {
                self.compare(ComparisonOp::LessThan, value.into())
            }

            /// Strictly later than `value`.
            #[must_use]
            pub fn is_after(&self, value: impl Into<Operand<$value>>) -> Filter {
                self.compare(ComparisonOp::GreaterThan, value.into())
            }

            /// Earlier than or equal to `value`.
            #[must_use]
            pub fn is_on_or_before(&self, value: impl Into<Operand<$value>>) -> Filter {
                self.compare(ComparisonOp::LessThanOrEqual, value.into())
            }

            /// Later than or equal to `value`.
            #[must_use]
            pub fn is_on_or_after(&self, value: impl Into<Operand<$value>>) -> Filter {
                self.compare(ComparisonOp::GreaterThanOrEqual, value.into())
            }

            /// `low <= column <= high`.
            #[must_use]
            pub fn is_between_inclusive(&self, low: $value, high: $value) -> Filter {
                self.temporal(TemporalPredicate::Ordered(OrderedTest::Between {
                    low,
                    high,
                    inclusive: true,
                }))
            }

            /// `low < column < high`.
            #[must_use]
            pub fn is_between_exclusive(&self, low: $value, high: $value) -> Filter {
                self.temporal(TemporalPredicate::Ordered(OrderedTest::Between {
                    low,
                    high,
                    inclusive: false,
                }))
            }

            /// Matches values equal to one of `values`.
            #[must_use]
            pub fn is_in<I>(&self, values: I) -> Filter
            where
                I: IntoIterator<Item = $value>,
            {
                self.temporal(TemporalPredicate::Ordered(OrderedTest::In {
                    values: values.into_iter().collect(),
                    negated: false,
                }))
            }

            /// Matches present values equal to none of `values`.
            #[must_use]
            pub fn is_not_in<I>(&self, values: I) -> Filter
            where
                I: IntoIterator<Item = $value>,
            {
                self.temporal(TemporalPredicate::Ordered(OrderedTest::In {
                    values: values.into_iter().collect(),
                    negated: true,
                }))
            }
        }
    };
}

macro_rules! calendar_ops {
    ($kind:ty) => {
        impl ColumnRef<$kind> {
            fn calendar(&self, test: CalendarTest) -> Filter {
                self.temporal(TemporalPredicate::Calendar(test))
            }

            /// Falls in `year`.
            #[must_use]
            pub fn is_in_year(&self, year: i32) -> Filter {
                self.calendar(CalendarTest::Year(year))
            }

            /// Falls in `month` of any year.
            #[must_use]
            pub fn is_in_month(&self, month: Month) -> Filter {
                self.calendar(CalendarTest::Month(month))
            }

            /// Falls in `quarter` of any year.
            #[must_use]
            pub fn is_in_quarter(&self, quarter: Quarter) -> Filter {
                self.calendar(CalendarTest::Quarter(quarter))
            }

            /// Falls on `day`.
            #[must_use]
            pub fn is_on_day_of_week(&self, day: Weekday) -> Filter {
                self.calendar(CalendarTest::DayOfWeek(day))
            }

            /// Falls on a Saturday or Sunday.
            #[must_use]
            pub fn is_weekend(&self) -> Filter {
                self.calendar(CalendarTest::Weekend)
            }

            /// Falls on Monday to Friday.
            #[must_use]
            pub fn is_weekday(&self) -> Filter {
                self.calendar(CalendarTest::WorkingDay)
            }

            /// Is the first day of its month.
            #[must_use]
            pub fn is_first_day_of_month(&self) -> Filter {
                self.calendar(CalendarTest::FirstDayOfMonth)
            }

            /// Is the last day of its month.
            #[must_use]
            pub fn is_last_day_of_month(&self) -> Filter {
                self.calendar(CalendarTest::LastDayOfMonth)
            }
        }
    };
}

macro_rules! clock_ops {
    ($kind:ty) => {
        impl ColumnRef<$kind> {
            fn clock(&self, test: ClockTest) -> Filter {
                self.temporal(TemporalPredicate::Clock(test))
            }

            /// Exactly midnight.
            #[must_use]
            pub fn is_midnight(&self) -> Filter {
                self.clock(ClockTest::Midnight)
            }

            /// Exactly noon.
            #[must_use]
            pub fn is_noon(&self) -> Filter {
                self.clock(ClockTest::Noon)
            }

            /// Strictly before noon.
            #[must_use]
            pub fn is_before_noon(&self) -> Filter {
                self.clock(ClockTest::BeforeNoon)
            }

            /// Strictly after noon.
            #[must_use]
            pub fn is_after_noon(&self) -> Filter {
                self.clock(ClockTest::AfterNoon)
            }
        }
    };
}

temporal_ordering_ops!(DateKind, NaiveDate, Date);
temporal_ordering_ops!(DateTimeKind, NaiveDateTime, DateTime);
temporal_ordering_ops!(TimeKind, NaiveTime, Time);
calendar_ops!(DateKind);
calendar_ops!(DateTimeKind);
clock_ops!(DateTimeKind);
clock_ops!(TimeKind);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{
            Date32Array, Date64Array, Time32SecondArray, Time64NanosecondArray,
            TimestampMillisecondArray, TimestampSecondArray,
        },
        datatypes::{DataType, Field, Schema, TimeUnit},
        record_batch::RecordBatch,
    };
    use chrono::{Month, NaiveDate, NaiveTime, Weekday};

    use super::Quarter;
    use crate::{
        column::{ColumnRef, DateKind, DateTimeKind, TimeKind},
        selection::RowId,
        Filter,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn days(value: NaiveDate) -> i32 {
        (value - date(1970, 1, 1)).num_days() as i32
    }

    fn batch() -> RecordBatch {
        // 2024-01-01 Mon, 2024-03-31 Sun, 2024-02-29 Thu, null, 2023-12-30 Sat
        let dates = [
            Some(date(2024, 1, 1)),
            Some(date(2024, 3, 31)),
            Some(date(2024, 2, 29)),
            None,
            Some(date(2023, 12, 30)),
        ];
        let date32: Vec<Option<i32>> = dates.iter().map(|d| d.map(days)).collect();
        let date64: Vec<Option<i64>> = dates
            .iter()
            .map(|d| d.map(|d| i64::from(days(d)) * 86_400_000))
            .collect();
        let midnight = 1_704_067_200_000i64; // 2024-01-01T00:00:00Z
        let stamps = vec![
            Some(midnight),
            Some(midnight + 12 * 3_600_000),
            Some(midnight + 9 * 3_600_000 + 1),
            None,
            Some(midnight + 13 * 3_600_000),
        ];
        let seconds: Vec<Option<i64>> = stamps.iter().map(|s| s.map(|s| s / 1000)).collect();
        let times = vec![
            Some(0),
            Some(12 * 3600),
            Some(9 * 3600),
            None,
            Some(13 * 3600),
        ];
        let nanos: Vec<Option<i64>> = times
            .iter()
            .map(|t: &Option<i32>| t.map(|t| i64::from(t) * 1_000_000_000 + 5))
            .collect();

        let schema = Arc::new(Schema::new(vec![
            Field::new("d", DataType::Date32, true),
            Field::new("d64", DataType::Date64, true),
            Field::new("ts", DataType::Timestamp(TimeUnit::Millisecond, None), true),
            Field::new(
                "ts_utc",
                DataType::Timestamp(TimeUnit::Second, Some("UTC".into())),
                true,
            ),
            Field::new("t", DataType::Time32(TimeUnit::Second), true),
            Field::new("t_ns", DataType::Time64(TimeUnit::Nanosecond), true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Date32Array::from(date32)),
                Arc::new(Date64Array::from(date64)),
                Arc::new(TimestampMillisecondArray::from(stamps)),
                Arc::new(TimestampSecondArray::from(seconds).with_timezone("UTC")),
                Arc::new(Time32SecondArray::from(times)),
                Arc::new(Time64NanosecondArray::from(nanos)),
            ],
        )
        .expect("record batch")
    }

    fn rows(filter: Filter) -> Vec<RowId> {
        filter.evaluate(&batch()).expect("evaluate").to_vec()
    }

    #[test]
    fn date_ordering_and_ranges() {
        let d = ColumnRef::<DateKind>::new("d");
        assert_eq!(rows(d.is_before(date(2024, 2, 29))), vec![0, 4]);
        assert_eq!(rows(d.is_on_or_before(date(2024, 2, 29))), vec![0, 2, 4]);
        assert_eq!(rows(d.is_after(date(2024, 1, 1))), vec![1, 2]);
        assert_eq!(
            rows(d.is_between_inclusive(date(2024, 1, 1), date(2024, 2, 29))),
            vec![0, 2]
        );
        assert_eq!(
            rows(d.is_between_exclusive(date(2024, 1, 1), date(2024, 2, 29))),
            Vec::<RowId>::new()
        );
        assert_eq!(rows(d.is_in([date(2023, 12, 30)])), vec![4]);
        assert_eq!(rows(d.is_not_in([date(2023, 12, 30)])), vec![0, 1, 2]);
    }

    #[test]
    fn date64_matches_date32() {
        let d = ColumnRef::<DateKind>::new("d");
        let d64 = ColumnRef::<DateKind>::new("d64");
        assert_eq!(rows(d.is_equal_to(&d64)), vec![0, 1, 2, 4]);
        assert_eq!(rows(d64.is_in_year(2024)), vec![0, 1, 2]);
    }

    #[test]
    fn calendar_tests() {
        let d = ColumnRef::<DateKind>::new("d");
        assert_eq!(rows(d.is_in_month(Month::February)), vec![2]);
        assert_eq!(rows(d.is_in_quarter(Quarter::Q1)), vec![0, 1, 2]);
        assert_eq!(rows(d.is_in_quarter(Quarter::Q4)), vec![4]);
        assert_eq!(rows(d.is_on_day_of_week(Weekday::Mon)), vec![0]);
        assert_eq!(rows(d.is_weekend()), vec![1, 4]);
        assert_eq!(rows(d.is_weekday()), vec![0, 2]);
        assert_eq!(rows(d.is_first_day_of_month()), vec![0]);
        assert_eq!(rows(d.is_last_day_of_month()), vec![1, 2]);
    }

    #[test]
    fn timestamps_support_calendar_and_clock_tests() {
        let ts = ColumnRef::<DateTimeKind>::new("ts");
        assert_eq!(rows(ts.is_midnight()), vec![0]);
        assert_eq!(rows(ts.is_noon()), vec![1]);
        assert_eq!(rows(ts.is_before_noon()), vec![0, 2]);
        assert_eq!(rows(ts.is_after_noon()), vec![4]);
        assert_eq!(rows(ts.is_in_year(2024)), vec![0, 1, 2, 4]);

        let noon = date(2024, 1, 1).and_hms_opt(12, 0, 0).expect("valid time");
        assert_eq!(rows(ts.is_on_or_after(noon)), vec![1, 4]);

        let utc = ColumnRef::<DateTimeKind>::new("ts_utc");
        // second precision drops the extra millisecond of row 2
        assert_eq!(rows(utc.is_equal_to(&ts)), vec![0, 1, 4]);
    }

    #[test]
    fn time_columns_support_clock_tests() {
        let t = ColumnRef::<TimeKind>::new("t");
        assert_eq!(rows(t.is_midnight()), vec![0]);
        assert_eq!(rows(t.is_after_noon()), vec![4]);
        let nine = NaiveTime::from_hms_opt(9, 0, 0).expect("valid time");
        assert_eq!(rows(t.is_equal_to(nine)), vec![2]);
        assert_eq!(rows(t.is_after(nine)), vec![1, 4]);

        // the extra nanosecond keeps these off the exact hour
        let t_ns = ColumnRef::<TimeKind>::new("t_ns");
        assert_eq!(rows(t_ns.is_midnight()), Vec::<RowId>::new());
        assert_eq!(rows(t_ns.is_after_noon()), vec![1, 4]);
        assert_eq!(rows(t_ns.is_after(&t)), vec![0, 1, 2, 4]);
    }
}

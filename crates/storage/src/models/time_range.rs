use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::RangeError;

/// Wire and display format of every date this service accepts or emits.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated, inclusive range of calendar days. Construction fails when
/// `to` is earlier than `from`, so a `TimeRange` can always be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl TimeRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, RangeError> {
        if to < from {
            return Err(RangeError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    /// Parses `YYYY-MM-DD` bounds named `from` and `to`.
    pub fn parse(from: &str, to: &str) -> Result<Self, RangeError> {
        Self::parse_fields(("from", from), ("to", to))
    }

    /// Parses bounds whose field names are reported back on failure.
    pub fn parse_fields(
        (from_field, from): (&'static str, &str),
        (to_field, to): (&'static str, &str),
    ) -> Result<Self, RangeError> {
        let from = parse_date(from_field, from)?;
        let to = parse_date(to_field, to)?;
        Self::new(from, to)
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Exclusive upper bound for timestamp comparisons, so that any time of
    /// day on `to` falls inside the range.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.to.succ_opt().unwrap_or(self.to)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.from.format(DATE_FORMAT),
            self.to.format(DATE_FORMAT)
        )
    }
}

pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, RangeError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| RangeError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Bucketing resolution of a category scores response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Granularity {
    Day,
    Week,
}

/// Key of a score bucket. Labels of one granularity order chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodLabel {
    Day(NaiveDate),
    /// ISO 8601 week-numbering year and week.
    Week { year: i32, week: u32 },
}

impl PeriodLabel {
    pub fn for_date(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => Self::Day(date),
            Granularity::Week => {
                let iso = date.iso_week();
                Self::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
        }
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::Week { year, week } => write!(f, "{year}-W{week:02}"),
        }
    }
}

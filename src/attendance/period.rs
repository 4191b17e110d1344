//! Calendar periods used to scope attendance queries.

use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

pub const INDONESIAN_MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    #[schema(value_type = String, example = "2025-05-01")]
    pub start: NaiveDate,
    #[schema(value_type = String, example = "2025-05-31")]
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The `days` days before `today` up to and including `today`.
    /// `None` when the start would fall before the first representable date.
    pub fn trailing_days(today: NaiveDate, days: i64) -> Option<Self> {
        let start = today.checked_sub_signed(TimeDelta::try_days(days)?)?;
        Some(Self::new(start, today))
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &DateRange) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A calendar month, parsed from `yyyy-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthPeriod {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month '{0}', expected yyyy-MM")]
pub struct InvalidMonth(pub String);

impl MonthPeriod {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn parse(value: &str) -> Result<Self, InvalidMonth> {
        let invalid = || InvalidMonth(value.to_string());
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day() - TimeDelta::days(1)
    }

    pub fn days(&self) -> u32 {
        self.last_day().day()
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.first_day(), self.last_day())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn month_name(&self) -> &'static str {
        let index = (self.month as usize).saturating_sub(1);
        INDONESIAN_MONTHS[index.min(INDONESIAN_MONTHS.len() - 1)]
    }

    /// Indonesian label, e.g. "Mei 2025".
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Sunday-started week containing `date`.
pub fn week_of(date: NaiveDate) -> DateRange {
    let start = date - TimeDelta::days(date.weekday().num_days_from_sunday() as i64);
    DateRange::new(start, start + TimeDelta::days(6))
}

/// `count` consecutive weeks ending with the week of `today`, oldest first.
pub fn trailing_weeks(today: NaiveDate, count: usize) -> Vec<DateRange> {
    let current = week_of(today);
    (0..count)
        .rev()
        .map(|back| {
            let start = current.start - TimeDelta::weeks(back as i64);
            DateRange::new(start, start + TimeDelta::days(6))
        })
        .collect()
}

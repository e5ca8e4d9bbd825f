//! Calendar date value type.
//!
//! `CalendarDate` is a plain `(year, month, day)` triple validated on
//! construction. All arithmetic is total once a date exists: rolling days,
//! stepping months with a clamped day-of-month, and splitting a date range
//! into days that fall in leap and non-leap years for actual/actual accrual.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use crate::errors::{CalcError, Result};

/// Whether a given year is a leap year (4/100/400 rule).
pub fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a given month of a given year.
pub fn days_in_month(month: u32, year: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// 365 or 366
pub fn days_in_year(year: u32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// A validated calendar date. Field order gives the (year, month, day) total order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDate", into = "RawDate")]
pub struct CalendarDate {
    year: u32,
    month: u32,
    day: u32,
}

/// unchecked wire form of a date
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawDate {
    day: u32,
    month: u32,
    year: u32,
}

impl TryFrom<RawDate> for CalendarDate {
    type Error = CalcError;

    fn try_from(raw: RawDate) -> Result<Self> {
        CalendarDate::new(raw.day, raw.month, raw.year)
    }
}

impl From<CalendarDate> for RawDate {
    fn from(date: CalendarDate) -> Self {
        RawDate {
            day: date.day,
            month: date.month,
            year: date.year,
        }
    }
}

impl CalendarDate {
    /// Create a date; fails with `InvalidDate` if any component is zero or
    /// the day exceeds the length of the month.
    pub fn new(day: u32, month: u32, year: u32) -> Result<Self> {
        if day == 0 || year == 0 || !(1..=12).contains(&month) || day > days_in_month(month, year) {
            return Err(CalcError::InvalidDate { day, month, year });
        }
        Ok(Self { year, month, day })
    }

    pub fn from_ymd(year: u32, month: u32, day: u32) -> Result<Self> {
        Self::new(day, month, year)
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn is_leap(&self) -> bool {
        is_leap_year(self.year)
    }

    pub fn days_in_current_month(&self) -> u32 {
        days_in_month(self.month, self.year)
    }

    /// Day of the year (1–366).
    pub fn day_of_year(&self) -> u32 {
        (1..self.month)
            .map(|m| days_in_month(m, self.year))
            .sum::<u32>()
            + self.day
    }

    /// Days left in the year after this one.
    pub fn days_remaining_in_year(&self) -> u32 {
        days_in_year(self.year) - self.day_of_year()
    }

    /// January 1st of the following year.
    pub fn start_of_next_year(&self) -> Self {
        Self {
            year: self.year + 1,
            month: 1,
            day: 1,
        }
    }

    /// Roll forward by `n` days, carrying into months and years.
    pub fn add_days(&self, n: u32) -> Self {
        let mut date = *self;
        let mut left = n;
        while left > 0 {
            let room = date.days_in_current_month() - date.day;
            if left <= room {
                date.day += left;
                break;
            }
            left -= room + 1;
            date.day = 1;
            date.step_month();
        }
        date
    }

    /// Advance exactly one month; the day becomes
    /// `min(target_day, days_in_month(new month))`.
    pub fn add_month_clamped(&self, target_day: u32) -> Self {
        let mut date = *self;
        date.step_month();
        date.day = target_day.clamp(1, date.days_in_current_month());
        date
    }

    /// Advance `months` months one at a time, clamping to `target_day`.
    pub fn add_months_clamped(&self, months: u32, target_day: u32) -> Self {
        (0..months).fold(*self, |date, _| date.add_month_clamped(target_day))
    }

    /// Advance a whole number of months by single-month steps, returning the
    /// new date with the total number of days elapsed across the steps.
    pub fn add_deposit_period(&self, months: u32, target_day: u32) -> (Self, u32) {
        let mut date = *self;
        let mut elapsed = 0;
        for _ in 0..months {
            let next = date.add_month_clamped(target_day);
            elapsed += date.days_until(&next);
            date = next;
        }
        (date, elapsed)
    }

    /// Split the days in `[self, other)` into `(non_leap_days, leap_days)`
    /// according to the year each day falls in. Empty when `other <= self`.
    pub fn days_between_split_by_leapness(&self, other: &CalendarDate) -> (u32, u32) {
        if other <= self {
            return (0, 0);
        }

        let mut non_leap = 0;
        let mut leap = 0;
        let mut bucket = |year: u32, days: u32| {
            if is_leap_year(year) {
                leap += days;
            } else {
                non_leap += days;
            }
        };

        if self.year == other.year {
            bucket(self.year, other.day_of_year() - self.day_of_year());
        } else {
            bucket(self.year, self.days_remaining_in_year() + 1);
            for year in self.year + 1..other.year {
                bucket(year, days_in_year(year));
            }
            bucket(other.year, other.day_of_year() - 1);
        }

        (non_leap, leap)
    }

    /// Days in `[self, other)`, zero when `other <= self`.
    pub fn days_until(&self, other: &CalendarDate) -> u32 {
        let (non_leap, leap) = self.days_between_split_by_leapness(other);
        non_leap + leap
    }

    fn step_month(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
    }
}

/// Signed day count `self - other`.
impl Sub for CalendarDate {
    type Output = i64;

    fn sub(self, other: CalendarDate) -> i64 {
        if self.year == other.year {
            return self.day_of_year() as i64 - other.day_of_year() as i64;
        }
        if self >= other {
            other.days_until(&self) as i64
        } else {
            -(self.days_until(&other) as i64)
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.day, self.month, self.year)
    }
}

impl fmt::Debug for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CalendarDate({:04}-{:02}-{:02})", self.year, self.month, self.day)
    }
}

/// parses `DD.MM.YYYY`
impl FromStr for CalendarDate {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        let parse = |p: Option<&&str>| p.and_then(|v| v.parse::<u32>().ok()).unwrap_or(0);
        if parts.len() != 3 {
            return Err(CalcError::InvalidDate { day: 0, month: 0, year: 0 });
        }
        CalendarDate::new(parse(parts.first()), parse(parts.get(1)), parse(parts.get(2)))
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = CalcError;

    fn try_from(date: NaiveDate) -> Result<Self> {
        let year = u32::try_from(date.year()).map_err(|_| CalcError::InvalidDate {
            day: date.day(),
            month: date.month(),
            year: 0,
        })?;
        CalendarDate::new(date.day(), date.month(), year)
    }
}

impl TryFrom<CalendarDate> for NaiveDate {
    type Error = CalcError;

    fn try_from(date: CalendarDate) -> Result<Self> {
        i32::try_from(date.year)
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, date.month, date.day))
            .ok_or(CalcError::InvalidDate {
                day: date.day,
                month: date.month,
                year: date.year,
            })
    }
}

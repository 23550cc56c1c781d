//! Calendar-month periods.
//!
//! A [`Period`] is the `YYYY-MM` bucket a photo belongs to. Ordering is
//! chronological, which for four-digit years is also the lexicographic order
//! of the canonical string.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

const MAX_YEAR: i64 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: u16,
    month: u8,
}

impl Period {
    /// Build a period from a year and a 1-based month.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PeriodOutOfRange`] if the month is not 1..=12 or the
    /// year does not fit in four digits.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        Self::from_index_parts(i64::from(year), i64::from(month))
    }

    fn from_index_parts(year: i64, month: i64) -> Result<Self, CoreError> {
        let out_of_range = || CoreError::PeriodOutOfRange { year, month };
        if !(0..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return Err(out_of_range());
        }
        Ok(Self {
            year: u16::try_from(year).map_err(|_| out_of_range())?,
            month: u8::try_from(month).map_err(|_| out_of_range())?,
        })
    }

    /// The period containing `date`.
    #[must_use]
    pub fn of_date(date: NaiveDate) -> Self {
        // Years outside 0..=9999 are clamped; chrono months are always 1..=12.
        let year = i64::from(date.year()).clamp(0, MAX_YEAR);
        Self::from_index_parts(year, i64::from(date.month())).unwrap_or(Self { year: 0, month: 1 })
    }

    /// The period containing today's local date.
    #[must_use]
    pub fn current() -> Self {
        Self::of_date(Local::now().date_naive())
    }

    #[must_use]
    pub const fn year(self) -> u16 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// Shift by `months` calendar months (negative = past), rolling over year
    /// boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PeriodOutOfRange`] if the result leaves year 0000..=9999.
    pub fn checked_shift(self, months: i32) -> Result<Self, CoreError> {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(months);
        Self::from_index_parts(index.div_euclid(12), index.rem_euclid(12) + 1)
    }

    /// Shift by `months`, saturating at `0000-01` and `9999-12`.
    #[must_use]
    pub fn shifted(self, months: i32) -> Self {
        self.checked_shift(months).unwrap_or(if months < 0 {
            Self { year: 0, month: 1 }
        } else {
            Self {
                year: 9999,
                month: 12,
            }
        })
    }

    /// The calendar month before this one.
    #[must_use]
    pub fn previous(self) -> Self {
        self.shifted(-1)
    }

    #[must_use]
    pub fn next(self) -> Self {
        self.shifted(1)
    }
}

/// The period `offset_months` away from the current local month.
#[must_use]
pub fn period_of(offset_months: i32) -> Period {
    Period::current().shifted(offset_months)
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidPeriod(s.to_string());
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(invalid());
        }
        let year: i32 = s[..4].parse().map_err(|_| invalid())?;
        let month: u32 = s[5..].parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

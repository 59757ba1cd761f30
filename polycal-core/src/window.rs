//! The time range synchronized in one run.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::error::{PolycalError, PolycalResult};

/// Half-open range `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SyncWindow {
    /// From the first instant of `instant`'s month to the first instant of the next month.
    pub fn month_containing(instant: DateTime<Utc>) -> Self {
        let first = instant.date_naive().with_day(1).unwrap_or(instant.date_naive());
        Self::from_first_day(first)
    }

    /// The current UTC month.
    pub fn current_month() -> Self {
        Self::month_containing(Utc::now())
    }

    pub fn for_month(year: i32, month: u32) -> PolycalResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            PolycalError::Config(format!("Invalid month {:04}-{:02}", year, month))
        })?;
        Ok(Self::from_first_day(first))
    }

    /// Parse `YYYY-MM`.
    pub fn parse_month(s: &str) -> PolycalResult<Self> {
        let invalid =
            || PolycalError::Config(format!("Invalid month '{}'. Expected YYYY-MM", s));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::for_month(year, month)
    }

    fn from_first_day(first: NaiveDate) -> Self {
        let next = first.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX);
        SyncWindow {
            start: first.and_time(chrono::NaiveTime::MIN).and_utc(),
            end: next.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339()
    }

    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339()
    }
}

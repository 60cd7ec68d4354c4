//! Month-of-year reporting windows.
//!
//! Every filter and aggregate in the application is scoped to a calendar
//! month. Windows are always computed against a single year: handlers pass
//! the current year, so records from other years are matched by month only.

use time::{Date, Month, OffsetDateTime};

use crate::Error;

/// The first and last day (inclusive) of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    /// The first day of the month.
    pub start: Date,
    /// The last day of the month.
    pub end: Date,
}

/// Parse the raw `month` query parameter into a calendar month.
///
/// # Errors
/// Returns [Error::InvalidMonth] if the parameter is missing, is not a whole
/// number, or is outside 1..=12.
pub fn parse_report_month(raw: Option<&str>) -> Result<Month, Error> {
    let raw = raw.ok_or_else(|| Error::InvalidMonth("month parameter is required".to_owned()))?;

    let number: u8 = raw.trim().parse().map_err(|_| {
        Error::InvalidMonth(format!(
            "month must be a whole number from 1 to 12, got \"{raw}\""
        ))
    })?;

    Month::try_from(number).map_err(|_| {
        Error::InvalidMonth(format!("month must be between 1 and 12, got {number}"))
    })
}

/// The year that report windows are evaluated against.
pub fn current_report_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

/// The inclusive first/last day range of `month` in `year`.
pub fn month_bounds(year: i32, month: Month) -> MonthRange {
    let start = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end = Date::from_calendar_date(year, month, month.length(year))
        .expect("invalid month end date");

    MonthRange { start, end }
}

/// The first day of the month after `month`, rolling into the next year after
/// December.
pub fn next_month_start(year: i32, month: Month) -> Date {
    let (next_year, next_month) = match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    };

    Date::from_calendar_date(next_year, next_month, 1).expect("invalid next month start date")
}

/// January 1st of `year`.
pub fn year_start(year: i32) -> Date {
    Date::from_calendar_date(year, Month::January, 1).expect("invalid year start date")
}

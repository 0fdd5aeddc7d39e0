// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! ISO week arithmetic for the attendance grid.
//!
//! Weeks run Monday through Sunday. A week offset of `n` selects the week
//! containing `today + n weeks`; offsets before the current week are not
//! browsable.
//!
//! "Today" is always resolved in the deployment's configured timezone so the
//! editable column flips at local midnight rather than UTC midnight.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use time::macros::format_description;
use time::{Date, Duration, Month};

use crate::error::DomainError;

const SECONDS_PER_WEEK: i64 = 7 * 86_400;

/// Number of days shown in an attendance week.
pub const DAYS_PER_WEEK: usize = 7;

/// One Monday-to-Sunday week selected by an offset from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceWeek {
    offset: i64,
    target_date: Date,
    days: [Date; DAYS_PER_WEEK],
}

impl AttendanceWeek {
    /// Computes the week containing `today + offset weeks`.
    ///
    /// # Arguments
    ///
    /// * `today` - The local calendar date
    /// * `offset` - Whole weeks forward from the current week
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NegativeWeekOffset` for offsets below zero and
    /// `DomainError::DateArithmeticOverflow` at the edges of the calendar.
    pub fn for_offset(today: Date, offset: i64) -> Result<Self, DomainError> {
        if offset < 0 {
            return Err(DomainError::NegativeWeekOffset(offset));
        }

        let target_date: Date = offset
            .checked_mul(SECONDS_PER_WEEK)
            .map(Duration::seconds)
            .and_then(|shift| today.checked_add(shift))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("{today} + {offset} weeks"),
            })?;

        let back: i64 = i64::from(target_date.weekday().number_days_from_monday());
        let monday: Date = target_date
            .checked_sub(Duration::days(back))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("Monday of week containing {target_date}"),
            })?;

        let mut days: [Date; DAYS_PER_WEEK] = [monday; DAYS_PER_WEEK];
        for i in 1..DAYS_PER_WEEK {
            days[i] = days[i - 1]
                .next_day()
                .ok_or_else(|| DomainError::DateArithmeticOverflow {
                    operation: format!("day after {}", days[i - 1]),
                })?;
        }

        Ok(Self {
            offset,
            target_date,
            days,
        })
    }

    /// The week containing `today`.
    ///
    /// # Errors
    ///
    /// Returns an error only at the edges of the representable calendar.
    pub fn current(today: Date) -> Result<Self, DomainError> {
        Self::for_offset(today, 0)
    }

    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// The date the offset landed on before snapping back to Monday.
    #[must_use]
    pub const fn target_date(&self) -> Date {
        self.target_date
    }

    #[must_use]
    pub const fn monday(&self) -> Date {
        self.days[0]
    }

    #[must_use]
    pub const fn sunday(&self) -> Date {
        self.days[DAYS_PER_WEEK - 1]
    }

    /// The seven dates of the week, Monday first.
    #[must_use]
    pub const fn days(&self) -> &[Date; DAYS_PER_WEEK] {
        &self.days
    }

    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        date >= self.monday() && date <= self.sunday()
    }

    /// Full English month name of the target date, e.g. `October`.
    #[must_use]
    pub fn month_name(&self) -> String {
        self.target_date.month().to_string()
    }

    /// Column heading used in weekly exports, e.g. `Monday (13-Oct)`.
    #[must_use]
    pub fn day_label(date: Date) -> String {
        let month: String = date.month().to_string();
        let short_month: &str = month.get(..3).unwrap_or(month.as_str());
        format!("{} ({:02}-{short_month})", date.weekday(), date.day())
    }
}

/// Week of the month a date falls in, counting from 1.
#[must_use]
pub fn week_of_month(date: Date) -> u8 {
    (date.day() - 1) / 7 + 1
}

/// Resolves the local calendar date for an instant in a named IANA timezone.
///
/// # Arguments
///
/// * `timezone` - IANA timezone name such as `Asia/Kolkata`
/// * `now` - The current instant
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` if the name is unknown.
pub fn local_today(timezone: &str, now: DateTime<Utc>) -> Result<Date, DomainError> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;

    let local = now.with_timezone(&tz).date_naive();

    let month: Month = u8::try_from(local.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| DomainError::InvalidDate(local.to_string()))?;
    let day: u8 =
        u8::try_from(local.day()).map_err(|_| DomainError::InvalidDate(local.to_string()))?;

    Date::from_calendar_date(local.year(), month, day)
        .map_err(|_| DomainError::InvalidDate(local.to_string()))
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the value is not a calendar date.
pub fn parse_iso_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| DomainError::InvalidDate(value.to_string()))
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

//! Local calendar semantics for grouping expenses by day, week and month.
//!
//! Expenses are stored as instants in time, but every aggregation works on
//! the calendar date the expense falls on in the user's timezone. Weeks start
//! on Sunday.

use std::fmt::Debug;

use time::{Date, Duration, Month, OffsetDateTime, UtcOffset};
use time_tz::{Offset, OffsetResult, PrimitiveDateTimeExt, TimeZone, Tz};

use crate::Error;

/// The timezone used to turn instants into calendar dates.
#[derive(Clone, Copy)]
pub enum Zone {
    /// A canonical IANA timezone, e.g. "Asia/Kolkata". Daylight saving is
    /// taken into account.
    Named(&'static Tz),
    /// A fixed offset from UTC.
    Fixed(UtcOffset),
}

impl Zone {
    /// Look up a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the name is not a known timezone.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        time_tz::timezones::get_by_name(name)
            .map(Zone::Named)
            .ok_or_else(|| Error::InvalidTimezone(name.to_owned()))
    }

    /// The current offset of the operating system's local timezone, or UTC
    /// if it cannot be determined.
    pub fn system() -> Self {
        match UtcOffset::current_local_offset() {
            Ok(offset) => Zone::Fixed(offset),
            Err(error) => {
                tracing::warn!("could not determine the local UTC offset, using UTC: {error}");
                Zone::Fixed(UtcOffset::UTC)
            }
        }
    }

    fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
        match self {
            Zone::Named(tz) => tz.get_offset_utc(&instant).to_utc(),
            Zone::Fixed(offset) => *offset,
        }
    }
}

impl Debug for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Named(tz) => f.debug_tuple("Named").field(&tz.name()).finish(),
            Zone::Fixed(offset) => f.debug_tuple("Fixed").field(offset).finish(),
        }
    }
}

/// Converts instants to local calendar dates.
///
/// The current time can be pinned with [Calendar::with_now] so that "today"
/// is reproducible.
#[derive(Debug, Clone)]
pub struct Calendar {
    zone: Zone,
    now: Option<OffsetDateTime>,
}

impl Calendar {
    /// Create a calendar for `zone` that uses the system clock.
    pub fn new(zone: Zone) -> Self {
        Self { zone, now: None }
    }

    /// Pin the current time to `now`.
    pub fn with_now(mut self, now: OffsetDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// The current instant.
    pub fn now(&self) -> OffsetDateTime {
        self.now.unwrap_or_else(OffsetDateTime::now_utc)
    }

    /// The local calendar date for today.
    pub fn today(&self) -> Date {
        self.local_date(self.now())
    }

    /// The local calendar date that `instant` falls on.
    pub fn local_date(&self, instant: OffsetDateTime) -> Date {
        instant.to_offset(self.zone.offset_at(instant)).date()
    }

    /// The instant of local midnight at the start of `date`.
    ///
    /// If midnight is skipped by a daylight saving transition, this is the
    /// first instant of the day. If it occurs twice, the earlier one is used.
    pub fn midnight(&self, date: Date) -> OffsetDateTime {
        let naive = date.midnight();

        let tz = match self.zone {
            Zone::Named(tz) => tz,
            Zone::Fixed(offset) => return naive.assume_offset(offset),
        };

        match naive.assume_timezone(tz) {
            OffsetResult::Some(instant) => instant,
            OffsetResult::Ambiguous(first, second) => first.min(second),
            OffsetResult::None => {
                // The day starts at the transition, which is midnight under
                // the offset in effect before it.
                let before = self.zone.offset_at(naive.assume_utc() - Duration::days(1));
                naive.assume_offset(before)
            }
        }
    }
}

/// The bucket key for grouping by day.
pub fn day_key(date: Date) -> Date {
    date
}

/// The bucket key for grouping by week: the Sunday on or before `date`.
pub fn week_key(date: Date) -> Date {
    date - Duration::days(date.weekday().number_days_from_sunday() as i64)
}

/// The bucket key for grouping by month: the first day of the month.
pub fn month_key(date: Date) -> Date {
    date - Duration::days(date.day() as i64 - 1)
}

/// A short label for a day, e.g. "Sat, Oct 18".
pub fn day_label(date: Date) -> String {
    let weekday = date.weekday().to_string();

    format!(
        "{}, {} {}",
        &weekday[..3],
        short_month(date.month()),
        date.day()
    )
}

/// A long label for a day, e.g. "Saturday, Oct 18".
pub fn long_day_label(date: Date) -> String {
    format!(
        "{}, {} {}",
        date.weekday(),
        short_month(date.month()),
        date.day()
    )
}

/// A label for the week starting on `start`, e.g. "Oct 12 - Oct 18".
pub fn week_label(start: Date) -> String {
    let end = start + Duration::days(6);

    format!(
        "{} {} - {} {}",
        short_month(start.month()),
        start.day(),
        short_month(end.month()),
        end.day()
    )
}

/// A label for the month containing `date`, e.g. "Oct 2025".
pub fn month_label(date: Date) -> String {
    format!("{} {}", short_month(date.month()), date.year())
}

fn short_month(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

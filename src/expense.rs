//! Defines the expense model, its persisted JSON form and the entry form that
//! validates user input.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{Error, calendar::Calendar};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// An opaque, unique identifier for an [Expense].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Wrap an existing ID string.
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }

    /// Create an ID from the milliseconds since the Unix epoch at `now`.
    ///
    /// If another expense in `existing` already uses that value, the
    /// millisecond count is bumped until the ID is unique.
    pub fn generate(now: OffsetDateTime, existing: &[Expense]) -> Self {
        let mut millis = now.unix_timestamp_nanos() / 1_000_000;

        loop {
            let candidate = millis.to_string();

            if !existing.iter().any(|expense| expense.id.0 == candidate) {
                return Self(candidate);
            }

            millis += 1;
        }
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money that was spent on something.
///
/// Expenses created through [ExpenseForm] always have a non-empty description
/// and a positive amount. Expenses read from storage or imported from a file
/// are taken as they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The unique ID of the expense.
    pub id: ExpenseId,
    /// What the money was spent on.
    #[serde(default)]
    pub description: String,
    /// How much was spent, rounded to two decimal places.
    #[serde(with = "amount_format")]
    pub amount: f64,
    /// When the money was spent.
    ///
    /// Only the local calendar date is used for grouping.
    #[serde(with = "timestamp_format")]
    pub date: OffsetDateTime,
}

/// The raw text of the add/edit expense form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseForm {
    /// The description as typed.
    pub description: String,
    /// The amount as typed, e.g. "12.50" or "12,50".
    pub amount: String,
    /// The date as `YYYY-MM-DD`, or empty for today.
    pub date: String,
}

impl ExpenseForm {
    /// Validate the form and create a new expense with a freshly generated ID.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::EmptyDescription] if the description is blank,
    /// - [Error::InvalidAmount] if the amount is not a number greater than zero,
    /// - [Error::InvalidDate] if the date is not empty and not `YYYY-MM-DD`.
    pub fn into_expense(self, calendar: &Calendar, existing: &[Expense]) -> Result<Expense, Error> {
        let description = normalize_description(&self.description)?;
        let amount = parse_amount(&self.amount)?;
        let date = parse_entry_date(&self.date, calendar)?;

        Ok(Expense {
            id: ExpenseId::generate(calendar.now(), existing),
            description,
            amount,
            date,
        })
    }

    /// A form pre-filled with the values of `expense`, as shown when editing.
    pub fn from_expense(expense: &Expense, calendar: &Calendar) -> Self {
        Self {
            description: expense.description.clone(),
            amount: format!("{:.2}", expense.amount),
            date: format_date(calendar.local_date(expense.date)),
        }
    }

    /// Validate the form and apply it to `original`, keeping its ID.
    ///
    /// The time of day of `original` is kept if the date was not changed.
    ///
    /// # Errors
    /// Returns the same errors as [ExpenseForm::into_expense].
    pub fn into_edited(self, original: &Expense, calendar: &Calendar) -> Result<Expense, Error> {
        let description = normalize_description(&self.description)?;
        let amount = parse_amount(&self.amount)?;
        let date = if self.date.trim() == format_date(calendar.local_date(original.date)) {
            original.date
        } else {
            parse_entry_date(&self.date, calendar)?
        };

        Ok(Expense {
            id: original.id.clone(),
            description,
            amount,
            date,
        })
    }
}

fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// Trim `description` and check that something is left.
///
/// # Errors
/// Returns [Error::EmptyDescription] if the trimmed description is empty.
pub fn normalize_description(description: &str) -> Result<String, Error> {
    let description = description.trim();

    if description.is_empty() {
        Err(Error::EmptyDescription)
    } else {
        Ok(description.to_owned())
    }
}

/// Parse the amount typed into the form, rounded to two decimal places.
///
/// A decimal comma is accepted in place of a decimal point. Empty text is
/// treated as zero and therefore rejected.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the text is not a finite number greater
/// than zero.
pub fn parse_amount(text: &str) -> Result<f64, Error> {
    let normalized = text.trim().replacen(',', ".", 1);

    let value = if normalized.is_empty() {
        0.0
    } else {
        normalized
            .parse::<f64>()
            .map_err(|_| Error::InvalidAmount(text.to_owned()))?
    };

    let rounded = (value * 100.0).round() / 100.0;

    if !rounded.is_finite() || rounded <= 0.0 {
        return Err(Error::InvalidAmount(text.to_owned()));
    }

    Ok(rounded)
}

/// Parse a `YYYY-MM-DD` date from the form into local midnight on that day.
///
/// Empty text means today.
///
/// # Errors
/// Returns [Error::InvalidDate] if the text is not a valid calendar date.
pub fn parse_entry_date(text: &str, calendar: &Calendar) -> Result<OffsetDateTime, Error> {
    let text = text.trim();

    let date = if text.is_empty() {
        calendar.today()
    } else {
        Date::parse(text, DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))?
    };

    Ok(calendar.midnight(date))
}

/// Format a timestamp the way it is persisted, e.g. `2025-10-18T09:30:00.000Z`.
pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        // The format only uses components that every date-time has.
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Parse a persisted timestamp.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates, which are read as
/// midnight UTC.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is neither.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, Error> {
    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(timestamp);
    }

    Date::parse(text, DATE_FORMAT)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

mod timestamp_format {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S: Serializer>(
        timestamp: &OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(*timestamp))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_timestamp(&text).map_err(serde::de::Error::custom)
    }
}

/// Whole amounts are written as integers (`10` rather than `10.0`) so that
/// collections written by other clients survive a load and save unchanged.
mod amount_format {
    use serde::{Deserialize, Deserializer, Serializer};

    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    pub fn serialize<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if amount.fract() == 0.0 && amount.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(*amount as i64)
        } else {
            serializer.serialize_f64(*amount)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        f64::deserialize(deserializer)
    }
}

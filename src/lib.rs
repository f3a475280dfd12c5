//! Spendlog is a personal expense tracker.
//!
//! Expenses are kept as one canonical collection that is written through to a
//! key-value store on every change. Statistics, the day listing and the
//! description suggestions are recomputed from that collection on demand.
//!
//! The library is used by the `spendlog` command line application, which keeps
//! its data in a SQLite file.

#![warn(missing_docs)]

mod aggregation;
mod calendar;
mod charts;
mod config;
mod currency;
mod db;
mod expense;
mod export;
mod grouping;
mod logging;
mod report;
mod stats;
mod stores;
mod suggestion;

pub use aggregation::{
    HasAmount, bucket_sum, format_change, moving_average, percent_change, top_n, total,
};
pub use calendar::{
    Calendar, Zone, day_key, day_label, long_day_label, month_key, month_label, week_key,
    week_label,
};
pub use charts::{
    ReportChart, daily_chart, item_breakdown_chart, report_charts, top_items_chart, weekly_chart,
};
pub use config::{Config, DEFAULT_CURRENCY_SYMBOL, DEFAULT_DB_PATH};
pub use currency::CurrencyFormat;
pub use db::initialize as initialize_db;
pub use expense::{
    Expense, ExpenseForm, ExpenseId, format_timestamp, normalize_description, parse_amount,
    parse_entry_date, parse_timestamp,
};
pub use export::{export_csv, export_json, import_json};
pub use grouping::{DayGroup, group_by_day};
pub use logging::setup_logging;
pub use report::render_report;
pub use stats::{DayTotal, Insights, ItemTotal, PeriodTotal, Summary, WeekTotal};
pub use stores::{
    EXPENSES_KEY, ExpenseStore, KeyValueStore, MemoryKeyValueStore, SQLiteKeyValueStore,
};
pub use suggestion::{Autocomplete, AutocompleteKey, SUGGESTION_LIMIT, Suggestion, filter, rank};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The description was empty after trimming whitespace.
    #[error("Please enter a description")]
    EmptyDescription,

    /// The amount could not be parsed, was not finite, or was not greater
    /// than zero.
    ///
    /// Callers should pass in the text the user entered.
    #[error("Enter a valid amount > 0 (got \"{0}\")")]
    InvalidAmount(String),

    /// The date was not a calendar date in the format `YYYY-MM-DD`.
    #[error("invalid date \"{0}\", expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The persisted collection exists but could not be parsed.
    ///
    /// [ExpenseStore::load] treats this the same as having no data, while
    /// [ExpenseStore::read] reports it.
    #[error("the stored expenses could not be read: {0}")]
    CorruptData(String),

    /// Writing to the key-value store would exceed its size limit.
    #[error("storage quota of {limit} bytes exceeded")]
    QuotaExceeded {
        /// The maximum number of bytes the store may hold.
        limit: usize,
    },

    /// The timezone is not a valid, canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The currency symbol could not be used to format amounts.
    #[error("invalid currency symbol \"{0}\"")]
    InvalidCurrency(String),

    /// No expense has the given ID.
    #[error("could not find an expense with the ID {0}")]
    ExpenseNotFound(ExpenseId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while writing CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// An error occurred while reading or writing a file.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IoError(value.to_string())
    }
}

//! Application settings shared by the binaries.

use std::path::PathBuf;

use rusqlite::Connection;

use crate::{
    Error,
    calendar::{Calendar, Zone},
    currency::CurrencyFormat,
    stores::{ExpenseStore, SQLiteKeyValueStore},
};

/// The default path of the SQLite database file.
pub const DEFAULT_DB_PATH: &str = "spendlog.db";
/// The default currency symbol.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Where expenses are stored and how dates and amounts are presented.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The path of the SQLite database file.
    pub db_path: PathBuf,
    /// A canonical timezone name such as "Asia/Kolkata". The system's current
    /// UTC offset is used if not set.
    pub timezone: Option<String>,
    /// The symbol amounts are prefixed with.
    pub currency_symbol: String,
    /// A file to write debug logs to, in addition to stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            timezone: None,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_owned(),
            log_file: None,
        }
    }
}

impl Config {
    /// The calendar for the configured timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the timezone name is not known.
    pub fn calendar(&self) -> Result<Calendar, Error> {
        let zone = match &self.timezone {
            Some(name) => Zone::from_name(name)?,
            None => Zone::system(),
        };

        Ok(Calendar::new(zone))
    }

    /// The currency format for the configured symbol.
    ///
    /// # Errors
    /// Returns [Error::InvalidCurrency] if the symbol cannot be used.
    pub fn currency(&self) -> Result<CurrencyFormat, Error> {
        CurrencyFormat::new(&self.currency_symbol)
    }

    /// Open the database file, creating it if needed, and load the stored
    /// expenses.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the database could not be opened or
    /// initialized.
    pub fn open_store(&self) -> Result<ExpenseStore<SQLiteKeyValueStore>, Error> {
        tracing::debug!("Opening database {}", self.db_path.display());

        let connection = Connection::open(&self.db_path)?;
        let storage = SQLiteKeyValueStore::new(connection)?;

        Ok(ExpenseStore::open(storage))
    }
}

/*! Sets up the tables the application needs in its SQLite database. */

use rusqlite::Connection;

use crate::Error;

/// A trait for adding a table schema to a database.
pub trait CreateTable {
    /// Create the table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// The key-value table that mirrors browser local storage.
pub struct LocalStorageTable;

impl CreateTable for LocalStorageTable {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

/// Create the application tables in `connection`.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    LocalStorageTable::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

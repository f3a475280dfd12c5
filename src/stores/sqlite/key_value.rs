//! Implements a SQLite backed key-value store.

use rusqlite::{Connection, OptionalExtension};

use crate::{Error, db::initialize, stores::KeyValueStore};

/// Stores values in the `local_storage` table of a SQLite database.
#[derive(Debug)]
pub struct SQLiteKeyValueStore {
    connection: Connection,
}

impl SQLiteKeyValueStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// This function will create the `local_storage` table if it does not
    /// exist.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the table could not be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self { connection })
    }

    /// The underlying database connection.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl KeyValueStore for SQLiteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.connection
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                (key,),
                |row| row.get(0),
            )
            .optional()
            .map_err(|error| error.into())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.connection.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.connection
            .execute("DELETE FROM local_storage WHERE key = ?1", (key,))?;

        Ok(())
    }
}

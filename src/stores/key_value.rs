//! Defines the key-value store trait.

use crate::Error;

/// Persists string values under string keys, like browser local storage.
///
/// Methods take `&self` because implementations are expected to be backed by
/// something with its own interior mutability, e.g. a database connection.
pub trait KeyValueStore {
    /// Retrieve the value stored under `key`, or `None` if there is none.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove the value stored under `key`. Removing a missing key is not an
    /// error.
    fn remove(&self, key: &str) -> Result<(), Error>;
}

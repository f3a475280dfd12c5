//! Contains the SQLite backed storage implementations.

pub mod key_value;

pub use key_value::SQLiteKeyValueStore;

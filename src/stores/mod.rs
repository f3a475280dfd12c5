//! Contains the key-value storage trait, its implementations and the expense
//! store that persists through it.

mod expense;
mod key_value;
mod memory;

pub mod sqlite;

pub use expense::{EXPENSES_KEY, ExpenseStore};
pub use key_value::KeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use sqlite::SQLiteKeyValueStore;

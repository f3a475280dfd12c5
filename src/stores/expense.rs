//! Implements the store that owns the canonical collection of expenses.

use crate::{
    Error,
    expense::{Expense, ExpenseId},
    stores::KeyValueStore,
};

/// The key the expense collection is stored under.
///
/// The `v1` suffix is the schema version of the stored JSON.
pub const EXPENSES_KEY: &str = "expenses:v1";

/// Holds the canonical list of expenses and writes it through to a
/// [KeyValueStore].
///
/// Every change rewrites the whole collection with a single write. Failed
/// writes are logged and otherwise ignored, so after a failure the in-memory
/// collection may be ahead of what is stored until the next successful write.
#[derive(Debug)]
pub struct ExpenseStore<S> {
    storage: S,
    expenses: Vec<Expense>,
}

impl<S: KeyValueStore> ExpenseStore<S> {
    /// Create a store backed by `storage`, loading any expenses already saved
    /// there.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            expenses: Vec::new(),
        };
        store.expenses = store.load();

        tracing::debug!("Loaded {} expenses", store.expenses.len());

        store
    }

    /// The canonical collection, in insertion order.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Retrieve the expense with the ID `id`.
    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| &expense.id == id)
    }

    /// The storage the collection is persisted to.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the stored collection.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::CorruptData] if the stored value is not a valid collection,
    /// - any error from the storage if it could not be read.
    ///
    /// A missing value is not an error and gives an empty collection.
    pub fn read(&self) -> Result<Vec<Expense>, Error> {
        let Some(raw) = self.storage.get(EXPENSES_KEY)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|error| Error::CorruptData(error.to_string()))
    }

    /// Read the stored collection, treating unreadable or corrupt data as an
    /// empty collection.
    pub fn load(&self) -> Vec<Expense> {
        self.read().unwrap_or_else(|error| {
            tracing::warn!("Ignoring stored expenses: {error}");
            Vec::new()
        })
    }

    /// Write `expenses` to storage, replacing whatever was stored before.
    ///
    /// Errors are logged and otherwise ignored.
    pub fn save(&self, expenses: &[Expense]) {
        let json = match serde_json::to_string(expenses) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!("Could not serialize expenses: {error}");
                return;
            }
        };

        match self.storage.set(EXPENSES_KEY, &json) {
            Ok(()) => tracing::debug!("Saved {} expenses", expenses.len()),
            Err(error) => tracing::warn!("Could not save expenses: {error}"),
        }
    }

    /// Append `expense` and persist the collection.
    pub fn add(&mut self, expense: Expense) -> &[Expense] {
        tracing::debug!("Adding expense {}", expense.id);
        self.expenses.push(expense);
        self.save(&self.expenses);

        &self.expenses
    }

    /// Replace the expense with the same ID as `expense` and persist the
    /// collection.
    ///
    /// Nothing is changed or written if no expense has that ID.
    pub fn update(&mut self, expense: Expense) -> &[Expense] {
        let Some(index) = self
            .expenses
            .iter()
            .position(|existing| existing.id == expense.id)
        else {
            tracing::debug!("Ignoring update to missing expense {}", expense.id);
            return &self.expenses;
        };

        self.expenses[index] = expense;
        self.save(&self.expenses);

        &self.expenses
    }

    /// Remove the expense with the ID `id` and persist the collection.
    ///
    /// Nothing is changed or written if no expense has that ID.
    pub fn remove(&mut self, id: &ExpenseId) -> &[Expense] {
        let count_before = self.expenses.len();
        self.expenses.retain(|expense| &expense.id != id);

        if self.expenses.len() != count_before {
            self.save(&self.expenses);
        } else {
            tracing::debug!("Ignoring removal of missing expense {id}");
        }

        &self.expenses
    }

    /// Append the expenses in `records` whose IDs are not in the collection
    /// yet, then persist the collection.
    ///
    /// Imported expenses are not validated.
    ///
    /// # Returns
    /// The number of expenses that were added.
    pub fn import(&mut self, records: Vec<Expense>) -> usize {
        let count_before = self.expenses.len();

        for record in records {
            if self.get(&record.id).is_none() {
                self.expenses.push(record);
            }
        }

        let imported = self.expenses.len() - count_before;
        if imported > 0 {
            self.save(&self.expenses);
        }

        imported
    }
}

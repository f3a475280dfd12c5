//! Description suggestions for autocompleting the expense form.
//!
//! Previously used descriptions are ranked by how recently and how often they
//! were used, then filtered by what has been typed so far.

use indexmap::IndexMap;
use time::OffsetDateTime;

use crate::expense::Expense;

/// The maximum number of suggestions shown at once.
pub const SUGGESTION_LIMIT: usize = 8;

/// A previously used description.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// The trimmed description.
    pub text: String,
    /// How many expenses use the description.
    pub count: usize,
    /// The date of the most recent expense with the description.
    pub last_used: OffsetDateTime,
}

/// Ranks the distinct, non-empty descriptions in `expenses`.
///
/// Most recently used descriptions come first. Descriptions last used at the
/// same time are ordered by how often they were used.
pub fn rank(expenses: &[Expense]) -> Vec<Suggestion> {
    let mut suggestions: IndexMap<&str, Suggestion> = IndexMap::new();

    for expense in expenses {
        let text = expense.description.trim();
        if text.is_empty() {
            continue;
        }

        suggestions
            .entry(text)
            .and_modify(|suggestion| {
                suggestion.count += 1;
                suggestion.last_used = suggestion.last_used.max(expense.date);
            })
            .or_insert_with(|| Suggestion {
                text: text.to_owned(),
                count: 1,
                last_used: expense.date,
            });
    }

    let mut ranked: Vec<Suggestion> = suggestions.into_values().collect();
    ranked.sort_by(|a, b| {
        b.last_used
            .cmp(&a.last_used)
            .then_with(|| b.count.cmp(&a.count))
    });

    ranked
}

/// The ranked suggestions that contain `query`, ignoring case, limited to
/// [SUGGESTION_LIMIT] entries.
pub fn filter<'a>(ranked: &'a [Suggestion], query: &str) -> Vec<&'a Suggestion> {
    let query = query.to_lowercase();

    ranked
        .iter()
        .filter(|suggestion| suggestion.text.to_lowercase().contains(&query))
        .take(SUGGESTION_LIMIT)
        .collect()
}

/// A key press handled by the suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocompleteKey {
    /// Move the highlight up.
    Up,
    /// Move the highlight down.
    Down,
    /// Commit the highlighted suggestion.
    Enter,
    /// Close the list.
    Escape,
}

/// The state of the suggestion list attached to the description field.
///
/// The list opens when the field gains focus or the user types, and closes on
/// escape, on a selection, or when the user interacts with something else.
/// The highlighted index always points into the currently visible list.
#[derive(Debug, Clone)]
pub struct Autocomplete {
    ranked: Vec<Suggestion>,
    query: String,
    open: bool,
    highlighted: Option<usize>,
}

impl Autocomplete {
    /// Create a closed suggestion list over `ranked` suggestions.
    pub fn new(ranked: Vec<Suggestion>) -> Self {
        Self {
            ranked,
            query: String::new(),
            open: false,
            highlighted: None,
        }
    }

    /// Whether the list is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The text in the description field.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The index of the highlighted suggestion in [Autocomplete::visible].
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// The suggestions currently shown, empty when the list is closed.
    pub fn visible(&self) -> Vec<&Suggestion> {
        if self.open {
            filter(&self.ranked, &self.query)
        } else {
            Vec::new()
        }
    }

    /// The description field gained focus.
    pub fn focus(&mut self) {
        self.open = true;
    }

    /// The user typed into the description field.
    pub fn input(&mut self, text: &str) {
        text.clone_into(&mut self.query);
        self.open = true;
        self.highlighted = None;
    }

    /// The user interacted with something outside the field and list.
    pub fn dismiss(&mut self) {
        self.close();
    }

    /// The user picked the suggestion at `index` in the visible list.
    ///
    /// # Returns
    /// The text of the chosen suggestion, which also replaces the field text.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let text = self.visible().get(index)?.text.clone();
        text.clone_into(&mut self.query);
        self.close();

        Some(text)
    }

    /// Handle a key press.
    ///
    /// # Returns
    /// The committed text when Enter selects a highlighted suggestion.
    pub fn key(&mut self, key: AutocompleteKey) -> Option<String> {
        match key {
            AutocompleteKey::Down => {
                self.open = true;
                let last = self.visible().len().checked_sub(1)?;
                self.highlighted = Some(match self.highlighted {
                    Some(index) => (index + 1).min(last),
                    None => 0,
                });
                None
            }
            AutocompleteKey::Up => {
                if self.open {
                    self.highlighted = self.highlighted.map(|index| index.saturating_sub(1));
                }
                None
            }
            AutocompleteKey::Enter => {
                let index = self.highlighted.filter(|_| self.open)?;
                self.select(index)
            }
            AutocompleteKey::Escape => {
                self.close();
                None
            }
        }
    }

    fn close(&mut self) {
        self.open = false;
        self.highlighted = None;
    }
}

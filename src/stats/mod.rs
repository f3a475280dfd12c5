//! Statistics module
//!
//! Derived views over the expense collection: headline totals with
//! period-over-period comparisons, and insights about where and when money was
//! spent. Everything is recomputed from the full collection.

mod insights;
mod summary;

pub use insights::{DayTotal, Insights, ItemTotal, WeekTotal};
pub use summary::{PeriodTotal, Summary};

//! Spending totals for today, the last seven days and this month.

use time::{Date, Duration};

use crate::{
    aggregation::percent_change,
    calendar::{Calendar, month_key},
    expense::Expense,
};

/// The total for a period and how it compares to the period before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodTotal {
    /// The total spent in the period.
    pub total: f64,
    /// The total spent in the period before.
    pub previous: f64,
    /// The change from `previous` to `total` as computed by
    /// [percent_change](crate::percent_change).
    pub change_percent: i64,
}

impl PeriodTotal {
    fn new(total: f64, previous: f64) -> Self {
        Self {
            total,
            previous,
            change_percent: percent_change(total, previous),
        }
    }
}

/// Headline totals.
///
/// Each current period is open-ended, so expenses dated in the future count
/// towards it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Spending today, compared with yesterday.
    pub today: PeriodTotal,
    /// Spending today and the six days before, compared with the seven days
    /// before that.
    pub last_7_days: PeriodTotal,
    /// Spending since the start of the month, compared with the whole of
    /// last month.
    pub this_month: PeriodTotal,
}

impl Summary {
    /// Compute the summary for `expenses` relative to the calendar's today.
    pub fn compute(expenses: &[Expense], calendar: &Calendar) -> Self {
        let today = calendar.today();
        let week_start = today - Duration::days(6);
        let month_start = month_key(today);
        let previous_month_start = month_key(month_start - Duration::days(1));

        let dates: Vec<(Date, f64)> = expenses
            .iter()
            .map(|expense| (calendar.local_date(expense.date), expense.amount))
            .collect();

        let since = |start: Date| -> f64 {
            dates
                .iter()
                .filter(|(date, _)| *date >= start)
                .map(|(_, amount)| amount)
                .sum()
        };
        let between = |start: Date, end: Date| -> f64 {
            dates
                .iter()
                .filter(|(date, _)| *date >= start && *date < end)
                .map(|(_, amount)| amount)
                .sum()
        };

        Self {
            today: PeriodTotal::new(since(today), between(today - Duration::days(1), today)),
            last_7_days: PeriodTotal::new(
                since(week_start),
                between(week_start - Duration::days(7), week_start),
            ),
            this_month: PeriodTotal::new(
                since(month_start),
                between(previous_month_start, month_start),
            ),
        }
    }
}

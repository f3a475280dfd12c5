//! Groups expenses by the local calendar day they fall on.

use time::Date;

use crate::{calendar::Calendar, expense::Expense};

/// The expenses on one calendar day.
#[derive(Debug, PartialEq)]
pub struct DayGroup<'a> {
    /// The local calendar date.
    pub date: Date,
    /// The expenses on `date`, newest first.
    pub expenses: Vec<&'a Expense>,
    /// The sum of the amounts of `expenses`.
    pub total: f64,
}

/// Groups `expenses` by local calendar day, newest day first.
pub fn group_by_day<'a>(expenses: &'a [Expense], calendar: &Calendar) -> Vec<DayGroup<'a>> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut days: Vec<DayGroup<'a>> = Vec::new();

    for expense in sorted {
        let date = calendar.local_date(expense.date);

        let day_group = match days.last_mut() {
            Some(current) if current.date == date => current,
            _ => {
                days.push(DayGroup {
                    date,
                    expenses: Vec::new(),
                    total: 0.0,
                });
                days.last_mut().expect("day group just added")
            }
        };

        day_group.total += expense.amount;
        day_group.expenses.push(expense);
    }

    days
}

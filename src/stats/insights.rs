//! Where and when the most money was spent.
//!
//! Provides the overall total, spending per item (description), the highest
//! spending day and week, the recent daily series with a smoothed trend, and
//! the recent weekly series.

use time::Date;

use crate::{
    aggregation::{bucket_sum, moving_average, percent_change, sort_descending, top_n, total},
    calendar::{Calendar, day_key, week_key},
    expense::Expense,
};

/// The label used for expenses without a description.
const UNLABELED: &str = "Unlabeled";
/// The label that items outside the breakdown are grouped under.
const OTHER_LABEL: &str = "Other";

const RECENT_DAYS: usize = 14;
const RECENT_WEEKS: usize = 8;
const TREND_RADIUS: usize = 2;
const BREAKDOWN_ITEMS: usize = 5;
const TOP_ITEMS: usize = 7;

/// The total spent on one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTotal {
    /// The trimmed description, or "Unlabeled".
    pub label: String,
    /// The total spent on the item.
    pub total: f64,
}

/// The total spent on one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayTotal {
    /// The local calendar date.
    pub date: Date,
    /// The total spent on `date`.
    pub total: f64,
    /// The moving average of the daily totals around `date`.
    pub trend: f64,
}

/// The total spent in one week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekTotal {
    /// The Sunday the week starts on.
    pub start: Date,
    /// The total spent in the week.
    pub total: f64,
    /// The change from the previous week in the series, if there is one.
    pub change_percent: Option<i64>,
}

/// Spending insights over the whole collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    /// The total of all expenses.
    pub total: f64,
    /// Spending per item, largest first.
    pub by_item: Vec<ItemTotal>,
    /// The item with the most spending.
    pub top_item: ItemTotal,
    /// The day with the most spending and its total.
    pub top_day: (Date, f64),
    /// The week with the most spending, keyed by its first day, and its total.
    pub top_week: (Date, f64),
    /// The most recent 14 days that have spending, oldest first.
    pub recent_days: Vec<DayTotal>,
    /// The most recent 8 weeks that have spending, oldest first.
    pub recent_weeks: Vec<WeekTotal>,
    /// The five largest items, plus "Other" for the rest when it is not zero.
    pub item_breakdown: Vec<ItemTotal>,
    /// The seven largest items.
    pub top_items: Vec<ItemTotal>,
}

impl Insights {
    /// Compute insights for `expenses`.
    ///
    /// # Returns
    /// `None` if there are no expenses.
    pub fn compute(expenses: &[Expense], calendar: &Calendar) -> Option<Self> {
        if expenses.is_empty() {
            return None;
        }

        let by_item: Vec<ItemTotal> = top_n(expenses, item_label, usize::MAX)
            .into_iter()
            .map(|(label, total)| ItemTotal { label, total })
            .collect();

        let mut days: Vec<(Date, f64)> =
            bucket_sum(expenses, |expense| day_key(calendar.local_date(expense.date)))
                .into_iter()
                .collect();
        days.sort_by_key(|(date, _)| *date);

        let mut weeks: Vec<(Date, f64)> =
            bucket_sum(expenses, |expense| week_key(calendar.local_date(expense.date)))
                .into_iter()
                .collect();
        weeks.sort_by_key(|(start, _)| *start);

        Some(Self {
            total: total(expenses),
            top_item: by_item[0].clone(),
            top_day: highest(&days),
            top_week: highest(&weeks),
            recent_days: recent_days(&days),
            recent_weeks: recent_weeks(&weeks),
            item_breakdown: item_breakdown(&by_item),
            top_items: by_item.iter().take(TOP_ITEMS).cloned().collect(),
            by_item,
        })
    }

    /// The share of [Insights::total] spent on `item`, as a whole percentage.
    ///
    /// Imported records are not validated, so the total can be zero, in
    /// which case every share is zero.
    pub fn share_percent(&self, item: &ItemTotal) -> f64 {
        if self.total > 0.0 {
            (item.total / self.total * 100.0).round()
        } else {
            0.0
        }
    }
}

fn item_label(expense: &Expense) -> String {
    let label = expense.description.trim();

    if label.is_empty() {
        UNLABELED.to_owned()
    } else {
        label.to_owned()
    }
}

/// The entry with the highest total in a chronologically sorted, non-empty
/// series. Ties go to the earliest entry.
fn highest(series: &[(Date, f64)]) -> (Date, f64) {
    let mut sorted = series.to_vec();
    sort_descending(&mut sorted);
    sorted[0]
}

fn recent_days(days: &[(Date, f64)]) -> Vec<DayTotal> {
    let recent = &days[days.len().saturating_sub(RECENT_DAYS)..];
    let values: Vec<f64> = recent.iter().map(|(_, total)| *total).collect();
    let trend = moving_average(&values, TREND_RADIUS);

    recent
        .iter()
        .zip(trend)
        .map(|((date, total), trend)| DayTotal {
            date: *date,
            total: *total,
            trend,
        })
        .collect()
}

fn recent_weeks(weeks: &[(Date, f64)]) -> Vec<WeekTotal> {
    let recent = &weeks[weeks.len().saturating_sub(RECENT_WEEKS)..];

    recent
        .iter()
        .enumerate()
        .map(|(index, (start, total))| WeekTotal {
            start: *start,
            total: *total,
            change_percent: index
                .checked_sub(1)
                .map(|previous| percent_change(*total, recent[previous].1)),
        })
        .collect()
}

fn item_breakdown(by_item: &[ItemTotal]) -> Vec<ItemTotal> {
    let mut breakdown: Vec<ItemTotal> = by_item.iter().take(BREAKDOWN_ITEMS).cloned().collect();
    let others: f64 = by_item
        .iter()
        .skip(BREAKDOWN_ITEMS)
        .map(|item| item.total)
        .sum();

    if others > 0.0 {
        breakdown.push(ItemTotal {
            label: OTHER_LABEL.to_owned(),
            total: others,
        });
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use time::{
        Duration, OffsetDateTime,
        macros::{date, datetime, offset},
    };

    use crate::{
        calendar::{Calendar, Zone},
        expense::{Expense, ExpenseId},
    };

    use super::{Insights, ItemTotal, WeekTotal};

    fn expense(description: &str, amount: f64, date: OffsetDateTime) -> Expense {
        Expense {
            id: ExpenseId::new(&format!("{description}{}", date.unix_timestamp())),
            description: description.to_owned(),
            amount,
            date,
        }
    }

    fn item(label: &str, total: f64) -> ItemTotal {
        ItemTotal {
            label: label.to_owned(),
            total,
        }
    }

    fn test_calendar() -> Calendar {
        Calendar::new(Zone::Fixed(offset!(UTC))).with_now(datetime!(2025-10-18 15:00 UTC))
    }

    #[test]
    fn no_insights_without_expenses() {
        assert_eq!(Insights::compute(&[], &test_calendar()), None);
    }

    #[test]
    fn ranks_items_and_labels_blank_descriptions() {
        let expenses = vec![
            expense("Coffee", 4.0, datetime!(2025-10-16 08:00 UTC)),
            expense("  ", 6.0, datetime!(2025-10-16 09:00 UTC)),
            expense("Lunch", 12.0, datetime!(2025-10-16 12:00 UTC)),
            expense(" Coffee ", 4.0, datetime!(2025-10-17 08:00 UTC)),
        ];

        let insights = Insights::compute(&expenses, &test_calendar()).unwrap();

        assert_eq!(insights.total, 26.0);
        assert_eq!(
            insights.by_item,
            vec![item("Lunch", 12.0), item("Coffee", 8.0), item("Unlabeled", 6.0)]
        );
        assert_eq!(insights.top_item, item("Lunch", 12.0));
    }

    #[test]
    fn top_day_and_week_prefer_earliest_on_ties() {
        let expenses = vec![
            expense("Taxi", 20.0, datetime!(2025-10-15 08:00 UTC)),
            expense("Lunch", 20.0, datetime!(2025-10-08 08:00 UTC)),
            expense("Coffee", 5.0, datetime!(2025-10-16 08:00 UTC)),
            expense("Coffee", 5.0, datetime!(2025-10-09 08:00 UTC)),
        ];

        let insights = Insights::compute(&expenses, &test_calendar()).unwrap();

        assert_eq!(insights.top_day, (date!(2025 - 10 - 08), 20.0));
        assert_eq!(insights.top_week, (date!(2025 - 10 - 05), 25.0));
    }

    #[test]
    fn recent_days_keep_last_fourteen_with_trend() {
        let start = datetime!(2025-09-01 12:00 UTC);
        let expenses: Vec<Expense> = (0..20)
            .map(|day| expense("Coffee", (day + 1) as f64, start + Duration::days(day)))
            .collect();

        let insights = Insights::compute(&expenses, &test_calendar()).unwrap();

        assert_eq!(insights.recent_days.len(), 14);
        assert_eq!(insights.recent_days[0].date, date!(2025 - 09 - 07));
        assert_eq!(insights.recent_days[0].total, 7.0);
        // (7 + 8 + 9) / 3
        assert_eq!(insights.recent_days[0].trend, 8.0);
        // (16 + 17 + 18 + 19 + 20) / 5
        assert_eq!(insights.recent_days[11].trend, 18.0);
        // (18 + 19 + 20) / 3
        assert_eq!(insights.recent_days[13].trend, 19.0);
    }

    #[test]
    fn recent_weeks_compare_with_previous_week() {
        let expenses = vec![
            expense("Rent", 100.0, datetime!(2025-10-01 08:00 UTC)),
            expense("Food", 150.0, datetime!(2025-10-08 08:00 UTC)),
            expense("Food", 75.0, datetime!(2025-10-15 08:00 UTC)),
        ];

        let insights = Insights::compute(&expenses, &test_calendar()).unwrap();

        assert_eq!(
            insights.recent_weeks,
            vec![
                WeekTotal {
                    start: date!(2025 - 09 - 28),
                    total: 100.0,
                    change_percent: None,
                },
                WeekTotal {
                    start: date!(2025 - 10 - 05),
                    total: 150.0,
                    change_percent: Some(50),
                },
                WeekTotal {
                    start: date!(2025 - 10 - 12),
                    total: 75.0,
                    change_percent: Some(-50),
                },
            ]
        );
    }

    #[test]
    fn breakdown_groups_remaining_items_as_other() {
        let labels = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let expenses: Vec<Expense> = labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                expense(
                    label,
                    (10 - index) as f64,
                    datetime!(2025-10-10 08:00 UTC) + Duration::hours(index as i64),
                )
            })
            .collect();

        let insights = Insights::compute(&expenses, &test_calendar()).unwrap();

        assert_eq!(
            insights.item_breakdown,
            vec![
                item("A", 10.0),
                item("B", 9.0),
                item("C", 8.0),
                item("D", 7.0),
                item("E", 6.0),
                item("Other", 12.0),
            ]
        );
        assert_eq!(insights.top_items.len(), 7);
        assert_eq!(insights.top_items[6], item("G", 4.0));
    }

    #[test]
    fn breakdown_omits_other_when_few_items() {
        let expenses = vec![expense("Coffee", 4.0, datetime!(2025-10-16 08:00 UTC))];

        let insights = Insights::compute(&expenses, &test_calendar()).unwrap();

        assert_eq!(insights.item_breakdown, vec![item("Coffee", 4.0)]);
    }

    #[test]
    fn shares_are_whole_percentages() {
        let expenses = vec![
            expense("Coffee", 1.0, datetime!(2025-10-16 08:00 UTC)),
            expense("Lunch", 2.0, datetime!(2025-10-17 08:00 UTC)),
        ];

        let insights = Insights::compute(&expenses, &test_calendar()).unwrap();

        assert_eq!(insights.share_percent(&item("Coffee", 1.0)), 33.0);
        assert_eq!(insights.share_percent(&item("Lunch", 2.0)), 67.0);
    }

    #[test]
    fn shares_are_zero_when_nothing_was_spent() {
        let expenses = vec![expense("Refund", 0.0, datetime!(2025-10-16 08:00 UTC))];

        let insights = Insights::compute(&expenses, &test_calendar()).unwrap();

        assert_eq!(insights.share_percent(&insights.item_breakdown[0]), 0.0);
    }
}

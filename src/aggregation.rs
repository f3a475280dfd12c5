//! Pure aggregation over expense records.
//!
//! Provides grouped sums, top-N rankings, period-over-period percentage
//! changes and a smoothing moving average. Nothing here is cached; callers
//! recompute from the full collection whenever it changes.

use std::{cmp::Ordering, hash::Hash};

use indexmap::IndexMap;

use crate::expense::Expense;

/// Something with an amount of money that can be summed.
pub trait HasAmount {
    /// The amount of money.
    fn amount(&self) -> f64;
}

impl HasAmount for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl<K> HasAmount for (K, f64) {
    fn amount(&self) -> f64 {
        self.1
    }
}

/// The sum of all amounts in `records`.
pub fn total<T: HasAmount>(records: &[T]) -> f64 {
    records.iter().map(HasAmount::amount).sum()
}

/// Groups `records` by the key returned from `bucket` and sums the amounts
/// in each group.
///
/// # Returns
/// A map from bucket key to total, in the order each key was first seen.
pub fn bucket_sum<T, K, F>(records: &[T], bucket: F) -> IndexMap<K, f64>
where
    T: HasAmount,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut totals = IndexMap::new();

    for record in records {
        *totals.entry(bucket(record)).or_insert(0.0) += record.amount();
    }

    totals
}

/// The `n` keys with the largest totals, largest first.
///
/// Keys with equal totals stay in the order they were first seen in `records`.
pub fn top_n<T, K, F>(records: &[T], key: F, n: usize) -> Vec<(K, f64)>
where
    T: HasAmount,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut totals: Vec<(K, f64)> = bucket_sum(records, key).into_iter().collect();
    sort_descending(&mut totals);
    totals.truncate(n);
    totals
}

/// Stable sort of `(key, total)` pairs by total, largest first.
pub(crate) fn sort_descending<K>(totals: &mut [(K, f64)]) {
    totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
}

/// The change from `previous` to `current` as a whole percentage.
///
/// When `previous` is zero the change is reported as `0` if `current` is also
/// zero and `100` otherwise, so a result of `100` may mean "doubled" or
/// "grew from nothing".
pub fn percent_change(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        return if current == 0.0 { 0 } else { 100 };
    }

    // Halves round up, so -12.5 becomes -12.
    ((current - previous) / previous * 100.0 + 0.5).floor() as i64
}

/// Formats a percentage change with an explicit sign for increases.
pub fn format_change(change_percent: i64) -> String {
    if change_percent > 0 {
        format!("+{change_percent}%")
    } else {
        format!("{change_percent}%")
    }
}

/// Smooths `series` with a centered moving average.
///
/// Each output point is the mean of the input points at most `radius`
/// positions away. The window is clipped at either end of the series rather
/// than padded, so it narrows near the edges.
pub fn moving_average(series: &[f64], radius: usize) -> Vec<f64> {
    (0..series.len())
        .map(|index| {
            let start = index.saturating_sub(radius);
            let end = (index + radius).min(series.len() - 1);
            let window = &series[start..=end];

            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{
        OffsetDateTime,
        macros::{date, datetime},
    };

    use crate::{
        calendar::{day_key, month_key, week_key},
        expense::{Expense, ExpenseId},
    };

    use super::{bucket_sum, format_change, moving_average, percent_change, top_n, total};

    fn create_test_expense(description: &str, amount: f64, date: OffsetDateTime) -> Expense {
        Expense {
            id: ExpenseId::new(&format!("{description}-{}", date.unix_timestamp())),
            description: description.to_owned(),
            amount,
            date,
        }
    }

    #[test]
    fn percent_change_handles_zero_previous() {
        assert_eq!(percent_change(0.0, 0.0), 0);
        assert_eq!(percent_change(1.0, 0.0), 100);
        assert_eq!(percent_change(12_345.0, 0.0), 100);
    }

    #[test]
    fn change_has_sign() {
        assert_eq!(format_change(50), "+50%");
        assert_eq!(format_change(-30), "-30%");
        assert_eq!(format_change(0), "0%");
    }

    #[test]
    fn percent_change_rounds() {
        assert_eq!(percent_change(150.0, 100.0), 50);
        assert_eq!(percent_change(50.0, 100.0), -50);
        assert_eq!(percent_change(0.0, 100.0), -100);
        assert_eq!(percent_change(10.0, 3.0), 233);
        assert_eq!(percent_change(87.5, 100.0), -12);
        assert_eq!(percent_change(112.5, 100.0), 13);
    }

    #[test]
    fn bucket_sum_groups_same_day() {
        let expenses = vec![
            create_test_expense("Lunch", 10.0, datetime!(2025-10-18 12:00 UTC)),
            create_test_expense("Coffee", 5.0, datetime!(2025-10-18 08:00 UTC)),
        ];

        let totals = bucket_sum(&expenses, |expense| day_key(expense.date.date()));

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[&date!(2025 - 10 - 18)], 15.0);
    }

    #[test]
    fn bucket_sum_by_week_and_month() {
        let expenses = vec![
            create_test_expense("Rent", 500.0, datetime!(2025-09-30 12:00 UTC)),
            create_test_expense("Lunch", 12.0, datetime!(2025-10-02 12:00 UTC)),
            create_test_expense("Taxi", 8.0, datetime!(2025-10-05 12:00 UTC)),
        ];

        let weekly = bucket_sum(&expenses, |expense| week_key(expense.date.date()));
        let monthly = bucket_sum(&expenses, |expense| month_key(expense.date.date()));

        assert_eq!(
            weekly.into_iter().collect::<Vec<_>>(),
            vec![(date!(2025 - 09 - 28), 512.0), (date!(2025 - 10 - 05), 8.0)]
        );
        assert_eq!(
            monthly.into_iter().collect::<Vec<_>>(),
            vec![(date!(2025 - 09 - 01), 500.0), (date!(2025 - 10 - 01), 20.0)]
        );
    }

    #[test]
    fn bucket_sum_handles_empty_input() {
        let expenses: Vec<Expense> = vec![];

        assert!(bucket_sum(&expenses, |expense| expense.description.clone()).is_empty());
    }

    #[test]
    fn top_n_breaks_ties_by_input_order() {
        let totals = vec![("a", 30.0), ("b", 30.0), ("c", 10.0)];

        let got = top_n(&totals, |(key, _)| *key, 2);

        assert_eq!(got, vec![("a", 30.0), ("b", 30.0)]);
    }

    #[test]
    fn top_n_sums_before_ranking() {
        let expenses = vec![
            create_test_expense("Coffee", 4.0, datetime!(2025-10-16 08:00 UTC)),
            create_test_expense("Lunch", 12.0, datetime!(2025-10-16 12:00 UTC)),
            create_test_expense("Coffee", 4.0, datetime!(2025-10-17 08:00 UTC)),
            create_test_expense("Coffee", 5.0, datetime!(2025-10-18 08:00 UTC)),
        ];

        let got = top_n(&expenses, |expense| expense.description.clone(), 5);

        assert_eq!(
            got,
            vec![("Coffee".to_owned(), 13.0), ("Lunch".to_owned(), 12.0)]
        );
    }

    #[test]
    fn moving_average_shrinks_window_at_edges() {
        assert_eq!(
            moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 1),
            vec![1.5, 2.0, 3.0, 4.0, 4.5]
        );
    }

    #[test]
    fn moving_average_wide_radius() {
        assert_eq!(moving_average(&[3.0, 6.0, 9.0], 2), vec![6.0, 6.0, 6.0]);
        assert_eq!(moving_average(&[4.0], 2), vec![4.0]);
        assert!(moving_average(&[], 2).is_empty());
    }

    #[test]
    fn total_sums_amounts() {
        let expenses = vec![
            create_test_expense("Coffee", 4.25, datetime!(2025-10-16 08:00 UTC)),
            create_test_expense("Lunch", 12.5, datetime!(2025-10-16 12:00 UTC)),
        ];

        assert_eq!(total(&expenses), 16.75);
    }
}

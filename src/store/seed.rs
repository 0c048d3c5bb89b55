//! The demonstration data written the first time a store is initialized.

use crate::error::Res;
use crate::model::{Category, FinanceData, Goal, Transaction, TransactionType};
use anyhow::Context;
use chrono::{DateTime, Datelike, Local, Months, NaiveDate, Utc};

use TransactionType::{Expense, Income};

/// Builds the sample data set relative to `now`: 9 categories, 18 transactions spread over the
/// current month and the two months before it, and 4 goals in various states.
pub(crate) fn sample_data(now: DateTime<Local>) -> Res<FinanceData> {
    let today = now.date_naive();
    let created_at = now.with_timezone(&Utc);

    let categories = vec![
        Category::new("cat_1", "Food", "🍽️", "#f87171"),
        Category::new("cat_2", "Transport", "🚗", "#fb923c"),
        Category::new("cat_3", "Housing", "🏠", "#a78bfa"),
        Category::new("cat_4", "Leisure", "🎮", "#38bdf8"),
        Category::new("cat_5", "Health", "💊", "#34d399"),
        Category::new("cat_6", "Salary", "💼", "#4f8ef7"),
        Category::new("cat_7", "Freelance", "💻", "#fbbf24"),
        Category::new("cat_8", "Education", "📚", "#f472b6"),
        Category::new("cat_9", "Investment", "📈", "#6ee7b7"),
    ];

    #[rustfmt::skip]
    let rows: [(&str, &str, i64, TransactionType, &str, u32, u32); 18] = [
        // This month
        ("tx_01", "Salary",                5800, Income,  "cat_6", 0, 5),
        ("tx_02", "Supermarket",            480, Expense, "cat_1", 0, 7),
        ("tx_03", "Freelance - website",   1200, Income,  "cat_7", 0, 10),
        ("tx_04", "Rent",                  1500, Expense, "cat_3", 0, 10),
        ("tx_05", "Electricity bill",       185, Expense, "cat_3", 0, 12),
        ("tx_06", "Pharmacy",                95, Expense, "cat_5", 0, 14),
        ("tx_07", "Restaurant",             120, Expense, "cat_1", 0, 16),
        ("tx_08", "Taxi",                    65, Expense, "cat_2", 0, 18),
        ("tx_09", "Streaming services",      55, Expense, "cat_4", 0, 20),
        // Last month
        ("tx_10", "Salary",                5800, Income,  "cat_6", 1, 5),
        ("tx_11", "Supermarket",            520, Expense, "cat_1", 1, 8),
        ("tx_12", "Rent",                  1500, Expense, "cat_3", 1, 10),
        ("tx_13", "Freelance - app",        800, Income,  "cat_7", 1, 15),
        ("tx_14", "Gym",                     90, Expense, "cat_5", 1, 15),
        ("tx_15", "Movies and dinner",      160, Expense, "cat_4", 1, 20),
        // Two months ago
        ("tx_16", "Salary",                5800, Income,  "cat_6", 2, 5),
        ("tx_17", "Supermarket",            460, Expense, "cat_1", 2, 9),
        ("tx_18", "Rent",                  1500, Expense, "cat_3", 2, 10),
    ];

    let mut transactions = Vec::with_capacity(rows.len());
    for (id, description, amount, kind, category, months_back, day) in rows {
        let date = day_of_month(today, months_back, day)?;
        transactions.push(Transaction::new(
            id,
            description,
            amount,
            kind,
            category,
            date,
        ));
    }

    #[rustfmt::skip]
    let goal_rows: [(&str, &str, &str, i64, i64, i32); 4] = [
        ("goal_1", "Trip to Europe",   "✈️", 15000,  6200,  8),
        ("goal_2", "Emergency fund",   "🛡️", 20000, 12500,  4),
        ("goal_3", "New laptop",       "💻",  4500,  4500, -1),
        ("goal_4", "English course",   "🇬🇧",  2400,   400, -2),
    ];

    let mut goals = Vec::with_capacity(goal_rows.len());
    for (id, name, icon, target, current, months_from_now) in goal_rows {
        let deadline = shift_months(today, months_from_now)?;
        goals.push(Goal::new(
            id, name, icon, target, current, deadline, created_at,
        ));
    }

    Ok(FinanceData {
        transactions,
        goals,
        categories,
    })
}

/// The date `day` of the month that is `months_back` months before the month of `today`.
fn day_of_month(today: NaiveDate, months_back: u32, day: u32) -> Res<NaiveDate> {
    today
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(months_back)))
        .and_then(|month| month.with_day(day))
        .with_context(|| format!("Unable to compute day {day} of {months_back} months ago"))
}

/// `today` moved by `months`, clamping the day to the end of the target month.
fn shift_months(today: NaiveDate, months: i32) -> Res<NaiveDate> {
    let shifted = if months >= 0 {
        today.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        today.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.with_context(|| format!("Unable to shift {today} by {months} months"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sample_sizes() {
        let data = sample_data(now()).unwrap();
        assert_eq!(data.categories.len(), 9);
        assert_eq!(data.transactions.len(), 18);
        assert_eq!(data.goals.len(), 4);
    }

    #[test]
    fn test_transactions_span_three_months_across_year_boundary() {
        let data = sample_data(now()).unwrap();
        let months: Vec<String> = data.transactions.iter().map(|t| t.year_month()).collect();
        assert_eq!(months.iter().filter(|m| *m == "2026-01").count(), 9);
        assert_eq!(months.iter().filter(|m| *m == "2025-12").count(), 6);
        assert_eq!(months.iter().filter(|m| *m == "2025-11").count(), 3);
    }

    #[test]
    fn test_goal_deadlines_clamp_to_month_end() {
        let data = sample_data(now()).unwrap();
        // Jan 31 + 4 months is May 31; Jan 31 - 2 months is Nov 30
        assert_eq!(
            data.goals[1].deadline(),
            NaiveDate::from_ymd_opt(2026, 5, 31).unwrap()
        );
        assert_eq!(
            data.goals[3].deadline(),
            NaiveDate::from_ymd_opt(2025, 11, 30).unwrap()
        );
    }

    #[test]
    fn test_goal_states() {
        let data = sample_data(now()).unwrap();
        let completed: Vec<&str> = data
            .goals
            .iter()
            .filter(|g| g.is_completed())
            .map(|g| g.id())
            .collect();
        assert_eq!(completed, vec!["goal_3"]);
    }
}

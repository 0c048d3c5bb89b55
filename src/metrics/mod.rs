//! Pure aggregate computations over collection snapshots.
//!
//! Nothing in here touches storage or reads the clock. The caller passes the snapshot and the
//! reference date, so every function is deterministic.

mod query;
mod series;
mod summary;

use crate::model::{Amount, Category, CategoryLookup, Transaction};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use crate::model::percent_of_target;
pub use query::{recent, SortField, TransactionQuery};
pub use series::{monthly_series, running_balance, BalancePoint, MonthPoint};
pub use summary::{dashboard, goal_summary, sort_goals, DashboardSummary, GoalOrder, GoalSummary};

/// A span of time relative to a reference date.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Window {
    /// Sunday through Saturday of the reference date's week.
    Week,
    /// The calendar month of the reference date.
    #[default]
    Month,
    /// The reference date's month and the `n - 1` months before it.
    TrailingMonths(u32),
    All,
}

impl Window {
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Window::Week => {
                let start = week_start(today);
                date >= start && date <= start + Duration::days(6)
            }
            Window::Month => month_index(date) == month_index(today),
            Window::TrailingMonths(n) => {
                let current = month_index(today);
                let first = current - i64::from((*n).max(1)) + 1;
                (first..=current).contains(&month_index(date))
            }
            Window::All => true,
        }
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Window::Week => f.write_str("week"),
            Window::Month => f.write_str("month"),
            Window::TrailingMonths(n) => write!(f, "{n}months"),
            Window::All => f.write_str("all"),
        }
    }
}

impl FromStr for Window {
    type Err = String;

    /// Accepts `week`, `month`, `all` and `<n>months` such as `3months`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "week" => Ok(Window::Week),
            "month" => Ok(Window::Month),
            "all" => Ok(Window::All),
            other => other
                .strip_suffix("months")
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .map(Window::TrailingMonths)
                .ok_or_else(|| {
                    format!("Invalid window '{other}', expected week, month, all or <n>months")
                }),
        }
    }
}

/// The Sunday on or before `date`.
pub(crate) fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Months since year zero, so that consecutive months differ by one.
pub(crate) fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// The transactions dated inside `window`, in their original order.
pub fn filter<'a>(
    transactions: &'a [Transaction],
    window: Window,
    today: NaiveDate,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| window.contains(t.date(), today))
        .collect()
}

/// Income, expense and their difference.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Totals {
    pub income: Amount,
    pub expense: Amount,
    pub balance: Amount,
}

impl Totals {
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut totals = Totals::default();
        for t in transactions {
            if t.is_income() {
                totals.income += t.amount();
            } else {
                totals.expense += t.amount();
            }
        }
        totals.balance = totals.income - totals.expense;
        totals
    }
}

/// One slice of the expense breakdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// The category id, or `uncategorized` for expenses whose category does not exist.
    pub category: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub total: Amount,
    /// Share of all expenses in the breakdown, 0..=100.
    pub percent: u32,
}

/// Expense totals by category, largest first. Ties keep the order in which categories were first
/// encountered. Expenses with a dangling category all land in one `uncategorized` bucket, so the
/// totals always add up to the total expense.
pub fn category_breakdown<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    categories: &[Category],
) -> Vec<CategoryTotal> {
    let lookup = CategoryLookup::new(categories);
    let mut order: Vec<(&str, Amount)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for t in transactions.into_iter().filter(|t| t.is_expense()) {
        let id = lookup.resolve_id(t.category());
        match positions.get(id) {
            Some(&ix) => order[ix].1 += t.amount(),
            None => {
                positions.insert(id, order.len());
                order.push((id, t.amount()));
            }
        }
    }
    order.sort_by(|a, b| b.1.cmp(&a.1));

    let total: Amount = order.iter().map(|(_, amount)| *amount).sum();
    order
        .into_iter()
        .map(|(id, amount)| {
            let category = lookup.get(id);
            CategoryTotal {
                category: id.to_string(),
                name: category.name().to_string(),
                icon: category.icon().to_string(),
                color: category.color().to_string(),
                total: amount,
                percent: percent_of_target(amount, total),
            }
        })
        .collect()
}

/// The number of distinct months that have at least one transaction, never less than 1.
pub fn active_months(transactions: &[Transaction]) -> usize {
    transactions
        .iter()
        .map(|t| month_index(t.date()))
        .collect::<HashSet<_>>()
        .len()
        .max(1)
}
